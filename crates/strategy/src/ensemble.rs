use common::{Direction, Vote};

/// Majority vote. A direction wins only with strictly more votes than each of
/// the other two; anything else, including no votes at all, is `Flat`.
pub fn combine(votes: &[Vote]) -> Direction {
    let count = |v: Vote| votes.iter().filter(|&&x| x == v).count();
    let (up, down, flat) = (count(Vote::Up), count(Vote::Down), count(Vote::Flat));

    if up > down && up > flat {
        Direction::Up
    } else if down > up && down > flat {
        Direction::Down
    } else {
        Direction::Flat
    }
}
