/// Ordered list of release actions for a staged constructor.
///
/// Each successful stage pushes the action that undoes it. If the list is
/// dropped while still armed (an early `?` return), the actions run in
/// reverse push order. `commit` disarms it once every stage succeeded.
pub struct Unwind<'a> {
    steps: Vec<(&'static str, Box<dyn FnOnce() + 'a>)>,
    armed: bool,
}

impl<'a> Unwind<'a> {
    pub fn new() -> Self {
        Self {
            steps: Vec::new(),
            armed: true,
        }
    }

    /// Register the action that releases the stage just completed.
    pub fn push(&mut self, label: &'static str, release: impl FnOnce() + 'a) {
        self.steps.push((label, Box::new(release)));
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Keep everything acquired so far; no action will run.
    pub fn commit(mut self) {
        self.armed = false;
        self.steps.clear();
    }

    fn run(&mut self) {
        while let Some((label, release)) = self.steps.pop() {
            log::debug!("unwind: {}", label);
            release();
        }
    }
}

impl Default for Unwind<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Unwind<'_> {
    fn drop(&mut self) {
        if self.armed {
            self.run();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;

    #[test]
    fn drop_runs_in_reverse() {
        let order = RefCell::new(Vec::new());
        {
            let mut unwind = Unwind::new();
            unwind.push("a", || order.borrow_mut().push("a"));
            unwind.push("b", || order.borrow_mut().push("b"));
            unwind.push("c", || order.borrow_mut().push("c"));
            assert_eq!(unwind.len(), 3);
        }
        assert_eq!(*order.borrow(), vec!["c", "b", "a"]);
    }

    #[test]
    fn commit_disarms() {
        let order = RefCell::new(Vec::new());
        let mut unwind = Unwind::new();
        unwind.push("a", || order.borrow_mut().push("a"));
        unwind.commit();

        assert!(order.borrow().is_empty());
    }

    #[test]
    fn early_return_unwinds_completed_stages_only() {
        let order = RefCell::new(Vec::new());

        let staged = |fail_at: usize| -> Result<(), usize> {
            let mut unwind = Unwind::new();
            for stage in 0..3 {
                if stage == fail_at {
                    return Err(stage);
                }
                let order = &order;
                unwind.push("stage", move || order.borrow_mut().push(stage));
            }
            unwind.commit();
            Ok(())
        };

        assert_eq!(staged(2), Err(2));
        assert_eq!(*order.borrow(), vec![1, 0]);

        order.borrow_mut().clear();
        assert_eq!(staged(5), Ok(()));
        assert!(order.borrow().is_empty());
    }
}
