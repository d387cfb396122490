use crate::coords::Transform;

use super::{QuadVariant, RectInstance};

/// One draw invocation: a variant, a transform, and the instances drawn with them.
///
/// Instances are drawn in order and are not depth-sorted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuadBatch {
    pub variant: QuadVariant,
    pub transform: Transform,
    pub instances: Vec<RectInstance>,
}

impl QuadBatch {
    pub fn new(variant: QuadVariant, transform: Transform) -> Self {
        Self {
            variant,
            transform,
            instances: Vec::new(),
        }
    }

    pub fn with_instances(
        variant: QuadVariant,
        transform: Transform,
        instances: Vec<RectInstance>,
    ) -> Self {
        Self {
            variant,
            transform,
            instances,
        }
    }

    #[inline]
    pub fn push(&mut self, instance: RectInstance) {
        self.instances.push(instance);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Drops all instances, keeping capacity.
    #[inline]
    pub fn clear(&mut self) {
        self.instances.clear();
    }
}

impl Extend<RectInstance> for QuadBatch {
    fn extend<I: IntoIterator<Item = RectInstance>>(&mut self, iter: I) {
        self.instances.extend(iter);
    }
}
