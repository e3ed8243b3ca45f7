use std::collections::HashSet;
use std::path::Path;

/// Hands out names that have not been handed out before within a session.
///
/// A taken `data.csv` becomes `data (2).csv`, then `data (3).csv`, and so on.
#[derive(Debug, Default, Clone)]
pub struct UniqueNames {
    taken: HashSet<String>,
}

impl UniqueNames {
    /// Reserve `candidate`, or the first free numbered variant of it.
    pub fn claim(&mut self, candidate: &str) -> String {
        if self.taken.insert(candidate.to_string()) {
            return candidate.to_string();
        }
        let (stem, ext) = split_extension(candidate);
        let mut n = 2;
        loop {
            let name = format!("{stem} ({n}){ext}");
            if self.taken.insert(name.clone()) {
                return name;
            }
            n += 1;
        }
    }

    /// Forget a name so it can be claimed again.
    pub fn release(&mut self, name: &str) {
        self.taken.remove(name);
    }
}

/// Split `name` into stem and extension (including the dot).
/// Names without an extension return an empty extension.
pub fn split_extension(name: &str) -> (&str, &str) {
    match Path::new(name).extension().and_then(|e| e.to_str()) {
        Some(ext) => {
            let cut = name.len() - ext.len() - 1;
            name.split_at(cut)
        }
        None => (name, ""),
    }
}
