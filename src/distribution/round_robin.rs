use super::layout::Layout;
use super::Rank;




/**
 * Deal boxes to ranks in the given sequence, one box per rank in turn
 * starting from the least used rank. With teams, the deal cycles over teams
 * and each team hands its boxes to its own workers in turn.
 */
pub fn deal<I>(sequence: I, nboxes: usize, layout: &Layout) -> Vec<Rank>
where
    I: IntoIterator<Item = usize>,
{
    let mut result = vec![0; nboxes];

    if layout.has_teams() {
        let (teams, workers) = layout.least_used_teams();
        let mut next_worker = vec![0; teams.len()];

        for (k, i) in sequence.into_iter().enumerate() {
            let team = teams[k % teams.len()];
            let worker = workers[team][next_worker[team] % layout.team_size()];
            next_worker[team] += 1;
            result[i] = layout.rank(team, worker) as Rank;
        }
    } else {
        let ranks = layout.least_used_ranks();

        for (k, i) in sequence.into_iter().enumerate() {
            result[i] = ranks[k % ranks.len()] as Rank;
        }
    }
    result
}




/**
 * Box `i` goes to the `i`-th least used rank, cycling. On an idle layout
 * this is simply `i % nprocs`.
 */
pub fn round_robin(nboxes: usize, layout: &Layout) -> Vec<Rank> {
    deal(0..nboxes, nboxes, layout)
}




/**
 * Heaviest boxes are dealt first, so each of the first `nprocs` ranks gets
 * one of the `nprocs` heaviest boxes. Equal weights keep box order.
 */
pub fn round_robin_weighted(weights: &[i64], layout: &Layout) -> Vec<Rank> {
    deal(heaviest_first(weights), weights.len(), layout)
}




/// Box indices sorted by weight descending, ties by index.
pub(crate) fn heaviest_first(weights: &[i64]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..weights.len()).collect();
    order.sort_by_key(|&i| (core::cmp::Reverse(weights[i]), i));
    order
}
