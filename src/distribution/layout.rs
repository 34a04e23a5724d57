use crate::error::{Error, Result};




/**
 * Describes the ranks a mapping distributes over: how many there are, how
 * they group into teams of consecutive ranks, and how much work each one
 * already carries. Strategies hand out the heaviest bins to the least used
 * ranks first.
 */
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Layout {
    nprocs: usize,
    team_size: usize,
    usage: Vec<i64>,
}




// ============================================================================
impl Layout {


    /**
     * An idle layout with no teams. Panics if `nprocs` is zero.
     */
    pub fn new(nprocs: usize) -> Self {
        assert!(nprocs > 0, "a distribution needs at least one process");
        Self {
            nprocs,
            team_size: 1,
            usage: vec![0; nprocs],
        }
    }


    /**
     * Group the ranks into teams of `team_size` consecutive ranks. The team
     * size must divide the number of processes.
     */
    pub fn with_teams(mut self, team_size: usize) -> Result<Self> {
        if team_size == 0 || self.nprocs % team_size != 0 {
            return Err(Error::InvalidTeamSize {
                team_size,
                nprocs: self.nprocs,
            });
        }
        self.team_size = team_size;
        Ok(self)
    }


    /**
     * Record the work each rank already carries, one entry per rank.
     */
    pub fn with_usage(mut self, usage: Vec<i64>) -> Result<Self> {
        if usage.len() != self.nprocs {
            return Err(Error::UsageLength {
                actual: usage.len(),
                nprocs: self.nprocs,
            });
        }
        self.usage = usage;
        Ok(self)
    }


    pub fn nprocs(&self) -> usize {
        self.nprocs
    }


    pub fn team_size(&self) -> usize {
        self.team_size
    }


    pub fn num_teams(&self) -> usize {
        self.nprocs / self.team_size
    }


    pub fn has_teams(&self) -> bool {
        self.team_size > 1
    }


    pub fn usage(&self) -> &[i64] {
        &self.usage
    }


    /// The rank of worker `worker` within team `team`.
    pub fn rank(&self, team: usize, worker: usize) -> usize {
        team * self.team_size + worker
    }


    /**
     * Return every rank ordered by usage, least used first. Ties go to the
     * lower rank, so an idle layout yields `0, 1, ..., nprocs - 1`.
     */
    pub fn least_used_ranks(&self) -> Vec<usize> {
        let mut ranks: Vec<usize> = (0..self.nprocs).collect();
        ranks.sort_by_key(|&r| (self.usage[r], r));
        ranks
    }


    /**
     * Return the teams ordered by total usage, and for every team its
     * workers (offsets within the team) ordered by usage. Both orders break
     * ties by index.
     */
    pub fn least_used_teams(&self) -> (Vec<usize>, Vec<Vec<usize>>) {
        let team_usage: Vec<i64> = (0..self.num_teams())
            .map(|t| (0..self.team_size).map(|w| self.usage[self.rank(t, w)]).sum())
            .collect();

        let mut teams: Vec<usize> = (0..self.num_teams()).collect();
        teams.sort_by_key(|&t| (team_usage[t], t));

        let workers = (0..self.num_teams())
            .map(|t| {
                let mut w: Vec<usize> = (0..self.team_size).collect();
                w.sort_by_key(|&w| (self.usage[self.rank(t, w)], w));
                w
            })
            .collect();

        (teams, workers)
    }
}
