use crate::annotation::Annotation;

/// Committed annotations in commit order.
#[derive(Clone, Debug, Default)]
pub struct AnnotationStore {
    annotations: Vec<Annotation>,
}

impl AnnotationStore {
    pub fn commit(&mut self, annotation: Annotation) {
        self.annotations.push(annotation);
    }

    pub fn all(&self) -> &[Annotation] {
        &self.annotations
    }

    /// Reloads replace the whole session, so only tests reset a store in place.
    #[cfg(test)]
    pub fn clear(&mut self) {
        self.annotations.clear();
    }

    pub fn len(&self) -> usize {
        self.annotations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.annotations.is_empty()
    }
}
