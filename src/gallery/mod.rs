//! Gallery grid and image cache
//!
//! The downloaded images of one search are split into the 20 visible tiles
//! and a reserve pool the slideshow draws from. Cache indices run across both:
//! `0..GRID_SIZE` are the visible slots, `GRID_SIZE..len()` the reserve.

mod slideshow;

pub use slideshow::{Slideshow, SlideshowState};

use rand::Rng;
use thiserror::Error;

/// Number of visible tiles
pub const GRID_SIZE: usize = 20;

/// Tiles per grid row
pub const GRID_COLUMNS: usize = 5;

/// Smallest search that can fill the grid and still leave a reserve
pub const MIN_IMAGES: usize = GRID_SIZE + 1;

/// Largest image cache for one search
pub const MAX_IMAGES: usize = 200;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GalleryError {
    #[error("{0} images loaded, but {min} or more are needed", min = MIN_IMAGES)]
    TooFewImages(usize),

    #[error("{0} images loaded, but at most {max} are allowed", max = MAX_IMAGES)]
    TooManyImages(usize),

    #[error("Visible slot {0} out of range")]
    SlotOutOfRange(usize),

    #[error("Reserve index {index} out of range {start}..{len}", start = GRID_SIZE)]
    ReserveOutOfRange { index: usize, len: usize },
}

/// Images of the current search, split into visible slots and reserve
#[derive(Debug, Clone, PartialEq)]
pub struct Gallery<T> {
    visible: Vec<T>,
    reserve: Vec<T>,
}

impl<T> Gallery<T> {
    /// Build a gallery from images in API order
    ///
    /// The first [`GRID_SIZE`] images become the visible slots.
    pub fn new(mut images: Vec<T>) -> Result<Self, GalleryError> {
        let len = images.len();
        if len < MIN_IMAGES {
            return Err(GalleryError::TooFewImages(len));
        }
        if len > MAX_IMAGES {
            return Err(GalleryError::TooManyImages(len));
        }

        let reserve = images.split_off(GRID_SIZE);
        Ok(Self {
            visible: images,
            reserve,
        })
    }

    /// Images bound to the grid, in slot order
    pub fn visible(&self) -> &[T] {
        &self.visible
    }

    /// Images not currently shown
    pub fn reserve(&self) -> &[T] {
        &self.reserve
    }

    /// Total cache length (visible + reserve)
    pub fn len(&self) -> usize {
        self.visible.len() + self.reserve.len()
    }

    /// Always false; a gallery holds at least [`MIN_IMAGES`]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Image at a cache index
    pub fn get(&self, index: usize) -> Option<&T> {
        if index < GRID_SIZE {
            self.visible.get(index)
        } else {
            self.reserve.get(index - GRID_SIZE)
        }
    }

    /// All images in cache order
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.visible.iter().chain(self.reserve.iter())
    }

    /// Exchange a visible slot with a reserve entry (by cache index)
    pub fn swap(&mut self, slot: usize, reserve_index: usize) -> Result<(), GalleryError> {
        let len = self.len();
        if slot >= GRID_SIZE {
            return Err(GalleryError::SlotOutOfRange(slot));
        }
        if reserve_index < GRID_SIZE || reserve_index >= len {
            return Err(GalleryError::ReserveOutOfRange {
                index: reserve_index,
                len,
            });
        }

        std::mem::swap(
            &mut self.visible[slot],
            &mut self.reserve[reserve_index - GRID_SIZE],
        );
        Ok(())
    }

    /// Pick a uniform visible slot and reserve index and swap them
    ///
    /// Returns `(slot, reserve_index)` in cache indices.
    pub fn random_swap<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
    ) -> Result<(usize, usize), GalleryError> {
        let slot = rng.gen_range(0..GRID_SIZE);
        let reserve_index = rng.gen_range(GRID_SIZE..self.len());
        self.swap(slot, reserve_index)?;
        Ok((slot, reserve_index))
    }
}
