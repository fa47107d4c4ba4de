//! Which tiers a set of changed source files touches.

use dtp_types::Tier;

/// Tiers touched by `filenames`, deduplicated, in tier order.
///
/// `*base.json` marks base, `brand/canvas.json` brand and anything under
/// `sys/` (the brand file included) sys.
pub fn changed_tiers<I, S>(filenames: I) -> Vec<Tier>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut touched = [false; 3];
    for name in filenames {
        let name = name.as_ref();
        if name.contains("base.json") {
            touched[0] = true;
        }
        if name.contains("brand/canvas.json") {
            touched[1] = true;
        }
        if name.contains("sys/") {
            touched[2] = true;
        }
    }
    Tier::ALL
        .into_iter()
        .zip(touched)
        .filter_map(|(tier, hit)| hit.then_some(tier))
        .collect()
}

/// Comma-joined form consumed by CI steps, e.g. `base,sys`.
pub fn join_tiers(tiers: &[Tier]) -> String {
    tiers.iter().map(Tier::as_str).collect::<Vec<_>>().join(",")
}
