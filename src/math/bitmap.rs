// Copyright 2020 @TwoCookingMice

use std::ops;
use std::vec::Vec;

/// Row-major 2D grid of values.
#[derive(Debug, Clone, PartialEq)]
pub struct Bitmap<T> {
    data: Vec<T>,
    height: usize,
    width: usize
}

impl<T> ops::Index<(usize, usize)> for Bitmap<T> {
    type Output = T;

    fn index(&self, index: (usize, usize)) -> &T {
        debug_assert!(index.0 < self.width && index.1 < self.height);
        &self.data[index.0 + self.width * index.1]
    }
}

impl<T> ops::IndexMut<(usize, usize)> for Bitmap<T> {
    fn index_mut(&mut self, index: (usize, usize)) -> &mut T {
        debug_assert!(index.0 < self.width && index.1 < self.height);
        &mut self.data[index.0 + self.width * index.1]
    }
}

impl<T: Clone + Default> Bitmap<T> {
    pub fn new(width: usize, height: usize) -> Self {
        Self { data: vec![T::default(); width * height],
               width,
               height }
    }
}

impl<T> Bitmap<T> {
    /// Wraps existing row-major data, `None` when the length does not match.
    pub fn from_vec(width: usize, height: usize, data: Vec<T>) -> Option<Self> {
        if data.len() != width * height {
            return None;
        }
        Some(Self { data, width, height })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }
}

/* Test for Bitmap */
