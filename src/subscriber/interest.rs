//! Subscriber interest set

use crate::protocol::ContentType;

/// Ordered set of content types a subscriber wants
///
/// Insertion order is kept so announcements go out in a stable order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InterestSet {
    types: Vec<ContentType>,
}

impl InterestSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a type; returns `false` if it was already present
    pub fn add(&mut self, content_type: ContentType) -> bool {
        if self.contains(content_type) {
            return false;
        }
        self.types.push(content_type);
        true
    }

    /// Remove a type; returns `false` if it was not present
    pub fn remove(&mut self, content_type: ContentType) -> bool {
        let before = self.types.len();
        self.types.retain(|ty| *ty != content_type);
        self.types.len() != before
    }

    pub fn contains(&self, content_type: ContentType) -> bool {
        self.types.contains(&content_type)
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn as_slice(&self) -> &[ContentType] {
        &self.types
    }

    pub fn to_vec(&self) -> Vec<ContentType> {
        self.types.clone()
    }
}

impl FromIterator<ContentType> for InterestSet {
    /// Duplicates are collapsed
    fn from_iter<I: IntoIterator<Item = ContentType>>(iter: I) -> Self {
        let mut set = Self::new();
        for ty in iter {
            set.add(ty);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_duplicates() {
        let mut set: InterestSet = [ContentType::SQUARE, ContentType::CIRCLE, ContentType::SQUARE]
            .into_iter()
            .collect();

        assert_eq!(set.as_slice(), &[ContentType::SQUARE, ContentType::CIRCLE]);
        assert!(!set.add(ContentType::CIRCLE));
        assert!(set.add(ContentType::TRIANGLE));
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn test_remove() {
        let mut set: InterestSet = [ContentType::SQUARE, ContentType::CIRCLE].into_iter().collect();

        assert!(set.remove(ContentType::SQUARE));
        assert!(!set.remove(ContentType::SQUARE));
        assert_eq!(set.to_vec(), vec![ContentType::CIRCLE]);

        assert!(set.remove(ContentType::CIRCLE));
        assert!(set.is_empty());
    }
}
