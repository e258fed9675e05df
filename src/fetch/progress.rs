//! Image loading progress and the cache being assembled for a fetch

use crate::gallery::{Gallery, GalleryError};

/// Resolved/total counter behind the progress bar
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Progress {
    resolved: usize,
    total: usize,
}

impl Progress {
    pub fn begin(total: usize) -> Self {
        Self { resolved: 0, total }
    }

    /// Count one more resolved image (never past the total)
    pub fn advance(&mut self) {
        if self.resolved < self.total {
            self.resolved += 1;
        }
    }

    pub fn resolved(&self) -> usize {
        self.resolved
    }

    /// Fraction in `[0, 1]`; exactly 1.0 when complete
    pub fn fraction(&self) -> f32 {
        if self.total == 0 {
            0.0
        } else {
            self.resolved as f32 / self.total as f32
        }
    }

    pub fn is_complete(&self) -> bool {
        self.total > 0 && self.resolved == self.total
    }
}

/// Images of an in-flight fetch, slotted by result index
#[derive(Debug)]
pub struct PendingImages<T> {
    images: Vec<Option<T>>,
    progress: Progress,
}

impl<T> PendingImages<T> {
    pub fn new(total: usize) -> Self {
        Self {
            images: (0..total).map(|_| None).collect(),
            progress: Progress::begin(total),
        }
    }

    /// Store the image for `index`; duplicates and unknown indices are ignored
    pub fn insert(&mut self, index: usize, image: T) -> bool {
        match self.images.get_mut(index) {
            Some(slot) if slot.is_none() => {
                *slot = Some(image);
                self.progress.advance();
                true
            }
            _ => false,
        }
    }

    pub fn progress(&self) -> Progress {
        self.progress
    }

    pub fn is_complete(&self) -> bool {
        self.progress.is_complete()
    }

    /// Turn the finished set into a gallery, keeping result order
    pub fn into_gallery(self) -> Result<Gallery<T>, GalleryError> {
        if !self.is_complete() {
            return Err(GalleryError::TooFewImages(self.progress.resolved()));
        }
        Gallery::new(self.images.into_iter().flatten().collect())
    }
}
