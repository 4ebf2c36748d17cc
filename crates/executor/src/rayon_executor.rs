use crate::Executor;
use log::debug;
use rayon::prelude::*;

/// Work-stealing executor on the global rayon pool.
#[derive(Clone, Copy, Debug, Default)]
pub struct RayonExecutor;

impl RayonExecutor {
    pub fn new() -> Self {
        debug!("rayon executor using {} threads", rayon::current_num_threads());
        Self
    }
}

impl Executor for RayonExecutor {
    fn execute_all<T, R, F>(&self, items: Vec<T>, f: F) -> Vec<R>
    where
        T: Send + 'static,
        R: Send + 'static,
        F: Fn(T) -> R + Send + Sync + Clone + 'static,
    {
        items.into_par_iter().map(f).collect()
    }

    fn execute_all_fallible<T, R, E, F>(&self, items: Vec<T>, f: F) -> Vec<Result<R, E>>
    where
        T: Send + 'static,
        R: Send + 'static,
        E: Send + 'static,
        F: Fn(T) -> Result<R, E> + Send + Sync + Clone + 'static,
    {
        items.into_par_iter().map(f).collect()
    }

    fn parallelism(&self) -> usize {
        rayon::current_num_threads()
    }

    fn name(&self) -> &'static str {
        "rayon"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rayon_preserves_input_order() {
        let results = RayonExecutor::new().execute_all((0..256).collect(), |x| x * 2);
        assert_eq!(results, (0..256).map(|x| x * 2).collect::<Vec<_>>());
    }
}
