use serde::{Deserialize, Serialize};

use crate::topology::GridPos;

/// Value a cell holds before its occupant first interacts.
pub const INITIAL_SIMILARITY: f64 = 1.0;

/// Receives the local similarity value after each interaction.
pub trait OverlaySink {
    fn set_cell_value(&mut self, pos: GridPos, similarity: f64);
}

/// Per-cell similarity values, row-major.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarityLayer {
    width: u32,
    height: u32,
    values: Vec<f64>,
}

impl SimilarityLayer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            values: vec![INITIAL_SIMILARITY; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn get(&self, pos: GridPos) -> Option<f64> {
        self.index(pos).map(|index| self.values[index])
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn mean(&self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        self.values.iter().sum::<f64>() / self.values.len() as f64
    }

    fn index(&self, pos: GridPos) -> Option<usize> {
        if pos.x < self.width && pos.y < self.height {
            Some(pos.y as usize * self.width as usize + pos.x as usize)
        } else {
            None
        }
    }
}

impl OverlaySink for SimilarityLayer {
    fn set_cell_value(&mut self, pos: GridPos, similarity: f64) {
        if let Some(index) = self.index(pos) {
            self.values[index] = similarity;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cells_start_fully_similar() {
        let layer = SimilarityLayer::new(4, 3);
        assert_eq!(layer.values().len(), 12);
        assert_eq!(layer.mean(), 1.0);
    }

    #[test]
    fn writes_land_on_their_cell() {
        let mut layer = SimilarityLayer::new(4, 3);
        layer.set_cell_value(GridPos::new(2, 1), 0.25);
        assert_eq!(layer.get(GridPos::new(2, 1)), Some(0.25));
        assert_eq!(layer.values()[6], 0.25);
        layer.set_cell_value(GridPos::new(9, 9), 0.0);
        assert_eq!(layer.get(GridPos::new(9, 9)), None);
    }
}
