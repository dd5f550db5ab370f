//! Which layers are active, and which [Thing] a physical key resolves to given those layers.

use crate::keymap::{lookup, Thing, BASE, LAYERS};

/// Bitmask of active layers. The base layer is always consulted, whatever its bit says.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LayerState(u8);

impl LayerState {
    pub fn layer_on(&mut self, layer: u8) {
        if (layer as usize) < LAYERS.len() {
            self.0 |= 1 << layer;
        }
    }

    pub fn layer_off(&mut self, layer: u8) {
        if (layer as usize) < LAYERS.len() {
            self.0 &= !(1 << layer);
        }
    }

    pub fn is_on(&self, layer: u8) -> bool {
        layer == BASE || ((layer as usize) < LAYERS.len() && self.0 & (1 << layer) != 0)
    }

    /// Turn `c` on if both `a` and `b` are on, otherwise off
    pub fn update_tri_layer(&mut self, a: u8, b: u8, c: u8) {
        if self.is_on(a) && self.is_on(b) {
            self.layer_on(c)
        } else {
            self.layer_off(c)
        }
    }

    /// Highest active layer
    pub fn highest(&self) -> u8 {
        (0..LAYERS.len() as u8).rev().find(|&l| self.is_on(l)).unwrap_or(BASE)
    }

    /// Walk down the active layers from the top, returning the first [Thing] that isn't
    /// [Thing::Transparent].
    pub fn resolve(&self, row: usize, col: usize) -> Thing {
        (0..LAYERS.len() as u8)
            .rev()
            .filter(|&l| self.is_on(l))
            .map(|l| lookup(l, row, col))
            .find(|thing| *thing != Thing::Transparent)
            .unwrap_or(Thing::Inactive)
    }
}
