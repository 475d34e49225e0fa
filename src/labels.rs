/// Ordered set of label names offered when a polygon is closed.
///
/// Lives for the whole program run; loading another image keeps it.
#[derive(Clone, Debug, Default)]
pub struct LabelRegistry {
    names: Vec<String>,
}

impl LabelRegistry {
    pub fn new<I, S>(initial: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut registry = Self::default();
        for name in initial {
            registry.add(name);
        }
        registry
    }

    /// Appends `name` unless it is empty or already registered.
    /// Returns whether the registry changed.
    pub fn add(&mut self, name: impl Into<String>) -> bool {
        let name = name.into();
        if name.is_empty() || self.contains(&name) {
            return false;
        }
        self.names.push(name);
        true
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    pub fn list(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }
}
