use crate::config::ConvergenceConfig;

/// True once the generation index passes `min_generations` (so at least
/// `min_generations + 2` generations have run) and the best fitness rose by
/// less than `threshold` across the trailing `window`.
pub fn has_converged(best_history: &[f64], config: &ConvergenceConfig) -> bool {
    if !config.enabled {
        return false;
    }
    let len = best_history.len();
    if len <= config.min_generations + 1 || len < config.window || config.window == 0 {
        return false;
    }
    let (Some(&last), Some(&earlier)) = (best_history.last(), best_history.get(len - config.window))
    else {
        return false;
    };
    last - earlier < config.threshold
}
