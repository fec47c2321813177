use super::Population;

use evotrain_nn::networks::FeedForwardNetwork;

use std::fmt;

/// Defines different possible reporting levels for logging.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReportingLevel {
    /// Clones every survivor.
    Survivors,
    /// Clones only the champion.
    Champion,
    /// Clones no networks.
    NoNetworks,
}

/// A snapshot of a population after a generation.
#[derive(Clone, Debug)]
pub struct Log {
    pub generation_number: usize,
    pub generation_sample: GenerationMemberRecord,
    /// Statistics over the scores of every slot in the generation.
    pub score_stats: Stats,
    /// The champion's mean squared error per sample and output.
    pub best_mean_squared_error: f64,
}

impl fmt::Display for Log {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Log {{\n\
            \tgeneration_number: {:?}\n\
            \tbest_mean_squared_error: {:?}\n\
            \tscores: {:?}\n\
            }}",
            self.generation_number, self.best_mean_squared_error, self.score_stats
        )
    }
}

/// A struct for reporting basic statistical data.
#[derive(Clone, Debug, PartialEq)]
pub struct Stats {
    pub maximum: f64,
    pub minimum: f64,
    pub mean: f64,
    pub median: f64,
}

impl Stats {
    /// Returns statistics about numbers in a sequence,
    /// or `None` if it is empty.
    ///
    /// # Examples
    /// ```
    /// use evotrain::logging::Stats;
    ///
    /// let stats = Stats::from_scores([-2.0, -1.0, 0.5, 1.0, 1.5]).unwrap();
    /// assert_eq!(stats.maximum, 1.5);
    /// assert_eq!(stats.minimum, -2.0);
    /// assert!(stats.mean.abs() < 1e-12);
    /// assert_eq!(stats.median, 0.5);
    ///
    /// assert_eq!(Stats::from_scores([]), None);
    /// ```
    pub fn from_scores(data: impl IntoIterator<Item = f64>) -> Option<Stats> {
        let mut data: Vec<f64> = data.into_iter().collect();
        if data.is_empty() {
            return None;
        }
        let (mut max, mut min) = (f64::MIN, f64::MAX);
        for &d in &data {
            max = d.max(max);
            min = d.min(min);
        }
        let mean = mean(&data);
        data.sort_by(f64::total_cmp);
        let mid = data.len() / 2;
        let median = if data.len() % 2 == 0 {
            (data[mid - 1] + data[mid]) / 2.0
        } else {
            data[mid]
        };
        Some(Stats {
            maximum: max,
            minimum: min,
            mean,
            median,
        })
    }
}

/// Running mean of `data`, which stays finite when scores
/// are clamped to `f64::MAX`. Zero for an empty slice.
pub(super) fn mean(data: &[f64]) -> f64 {
    data.iter()
        .enumerate()
        .fold(0.0, |mean, (i, &d)| mean + (d - mean) / (i + 1) as f64)
}

/// A reporting-level dependant store
/// of networks from a population.
#[derive(Clone, Debug)]
pub enum GenerationMemberRecord {
    /// Every survivor, best first, with its score.
    Survivors(Vec<(FeedForwardNetwork, f64)>),
    /// Only the champion and its score.
    Champion(FeedForwardNetwork, f64),
    /// Empty.
    None,
}

/// A log of the evolution of a population over time.
#[derive(Clone, Debug)]
pub struct EvolutionLogger {
    reporting_level: ReportingLevel,
    logs: Vec<Log>,
}

impl EvolutionLogger {
    /// Returns a logger with the appropiate reporting level.
    pub fn new(reporting_level: ReportingLevel) -> EvolutionLogger {
        EvolutionLogger {
            reporting_level,
            logs: vec![],
        }
    }

    /// Store a snapshot of a population. Does nothing
    /// if the population has not evolved yet.
    ///
    /// # Examples
    /// ```
    /// use evotrain::logging::{EvolutionLogger, ReportingLevel};
    /// use evotrain::{Population, Termination, TrainingConfig, TrainingOptions};
    ///
    /// let options = TrainingOptions::new(TrainingConfig {
    ///     population_size: 10,
    ///     survivor_count: 2,
    ///     tests_per_network: 5,
    ///     input_count: 1,
    ///     output_count: 1,
    ///     hidden_height: 2,
    ///     hidden_layer_count: 1,
    ///     mutation_chance: 0.5,
    ///     learning_rate: 0.5,
    ///     termination: Termination::Generations(3),
    ///     ..TrainingConfig::default()
    /// })
    /// .unwrap();
    /// let mut population = Population::new(options);
    /// let mut logger = EvolutionLogger::new(ReportingLevel::Champion);
    ///
    /// for _ in 0..3 {
    ///     population.evolve(&|x: &[f32]| vec![x[0] / 2.0]).unwrap();
    ///     logger.log(&population);
    /// }
    /// assert_eq!(logger.iter().count(), 3);
    /// ```
    pub fn log(&mut self, population: &Population) {
        let (Some(score_stats), Some(best_mean_squared_error)) = (
            Stats::from_scores(population.generation_scores().iter().copied()),
            population.best_mean_squared_error(),
        ) else {
            return;
        };
        let mut survivors = population
            .survivors()
            .iter()
            .zip(population.survivor_scores().iter().copied());
        self.logs.push(Log {
            generation_number: population.generation(),
            generation_sample: match self.reporting_level {
                ReportingLevel::Survivors => GenerationMemberRecord::Survivors(
                    survivors.map(|(n, s)| (n.clone(), s)).collect(),
                ),
                ReportingLevel::Champion => match survivors.next() {
                    Some((champion, score)) => {
                        GenerationMemberRecord::Champion(champion.clone(), score)
                    }
                    None => GenerationMemberRecord::None,
                },
                ReportingLevel::NoNetworks => GenerationMemberRecord::None,
            },
            score_stats,
            best_mean_squared_error,
        })
    }

    /// Iterate over all logged snapshots.
    pub fn iter(&self) -> impl Iterator<Item = &Log> {
        self.logs.iter()
    }

    /// Returns the most recent snapshot.
    pub fn latest(&self) -> Option<&Log> {
        self.logs.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn even_length_median_averages_middle_pair() {
        let stats = Stats::from_scores([4.0, 1.0, 3.0, 2.0]).unwrap();
        assert_eq!(stats.median, 2.5);
        assert!((stats.mean - 2.5).abs() < 1e-12);
        assert_eq!(stats.minimum, 1.0);
        assert_eq!(stats.maximum, 4.0);
    }

    #[test]
    fn single_value() {
        let stats = Stats::from_scores([f64::MAX]).unwrap();
        assert_eq!(stats.median, f64::MAX);
        assert_eq!(stats.minimum, f64::MAX);
        assert_eq!(stats.mean, f64::MAX);
    }

    #[test]
    fn clamped_scores_keep_the_mean_finite() {
        let stats = Stats::from_scores([f64::MAX, 0.0, f64::MAX, 1.0]).unwrap();
        assert!(stats.mean.is_finite());
        assert!(stats.mean > f64::MAX / 4.0 && stats.mean < f64::MAX);
        assert_eq!(mean(&[]), 0.0);
    }
}
