use std::collections::HashMap;

/// Hands out `{name}_{n}` column names, where `n` counts how many times
/// `name` was seen before by this counter.
///
/// One counter covers exactly one row: build a fresh one per row so the
/// suffixes never carry over.
#[derive(Debug, Default)]
pub struct UniqueNames {
    seen: HashMap<String, usize>,
}

impl UniqueNames {
    pub fn new() -> UniqueNames {
        UniqueNames::default()
    }

    pub fn name(&mut self, name: &str) -> String {
        let count = match self.seen.get_mut(name) {
            Some(count) => {
                *count += 1;
                *count
            }
            None => {
                self.seen.insert(name.to_string(), 0);
                0
            }
        };

        format!("{}_{}", name, count)
    }
}
