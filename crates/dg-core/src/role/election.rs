//! Preference-biased random election

use crate::rng::GameRng;

/// Pick a key, favoring keys whose preference equals `target`
///
/// Every key holds one ticket, or `multiplier` tickets when its preference
/// is `target`; one ticket is then drawn uniformly. Tickets are laid out in
/// key order, so a fixed seed always elects the same key. A `multiplier` of
/// 1 makes every key equally likely.
///
/// Returns `None` when `preferences` is empty or `multiplier` is 0.
pub fn elect<'a, K, P>(
    target: &P,
    preferences: &'a [(K, P)],
    multiplier: u32,
    rng: &mut GameRng,
) -> Option<&'a K>
where
    P: PartialEq,
{
    if multiplier == 0 {
        return None;
    }
    let tickets = |pref: &P| {
        if pref == target {
            u64::from(multiplier)
        } else {
            1
        }
    };

    let total = preferences
        .iter()
        .try_fold(0u64, |sum, (_, pref)| sum.checked_add(tickets(pref)))?;
    if total == 0 {
        return None;
    }

    let mut draw = rng.rn2_wide(total);
    for (key, pref) in preferences {
        let held = tickets(pref);
        if draw < held {
            return Some(key);
        }
        draw -= held;
    }
    None
}
