//! Pointer state and the smoothed "energy" scalar.

use glam::Vec2;

/// Fraction of the previous energy retained as a floor while the pointer is
/// active; the observed influence peak can only raise it above this.
const ENERGY_HOLD: f32 = 0.8;
/// Per-tick decay factor once the pointer goes inactive.
const ENERGY_DECAY: f32 = 0.9;

/// Pointer position in normalized surface coordinates plus the derived
/// energy value.
///
/// Mutated only by move/down/leave events and the per-tick [`relax`] step;
/// read by the motion integrator and, for cosmetic intensity, by the surface.
///
/// [`relax`]: PointerState::relax
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerState {
    /// Normalized position in `[0, 1] × [0, 1]`.
    pub pos: Vec2,
    pub active: bool,
    energy: f32,
}

impl Default for PointerState {
    fn default() -> Self {
        Self {
            pos: Vec2::splat(0.5),
            active: false,
            energy: 0.0,
        }
    }
}

impl PointerState {
    /// Handles a move or press at a normalized surface position.
    pub fn point_at(&mut self, norm: Vec2) {
        self.pos = norm.clamp(Vec2::ZERO, Vec2::ONE);
        self.active = true;
    }

    /// Handles the pointer leaving the surface.
    pub fn leave(&mut self) {
        self.active = false;
        self.energy = 0.0;
    }

    /// Per-tick energy relaxation toward the newly observed influence peak
    /// (active) or toward zero (inactive). Never jumps; always ends up in
    /// `[0, 1]`.
    pub fn relax(&mut self, peak: f32) {
        let target = if self.active {
            peak.max(self.energy * ENERGY_HOLD)
        } else {
            self.energy * ENERGY_DECAY
        };
        self.energy = target.clamp(0.0, 1.0);
    }

    pub fn energy(&self) -> f32 {
        self.energy
    }

    /// Pointer position in viewport pixels.
    pub fn px(&self, width: f32, height: f32) -> Vec2 {
        Vec2::new(self.pos.x * width, self.pos.y * height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_at_clamps_into_unit_square() {
        let mut p = PointerState::default();
        p.point_at(Vec2::new(1.4, -0.2));
        assert_eq!(p.pos, Vec2::new(1.0, 0.0));
        assert!(p.active);
    }

    #[test]
    fn leave_deactivates_and_zeroes_energy() {
        let mut p = PointerState::default();
        p.point_at(Vec2::splat(0.5));
        p.relax(0.9);
        assert!(p.energy() > 0.0);

        p.leave();
        assert!(!p.active);
        assert_eq!(p.energy(), 0.0);
    }

    #[test]
    fn energy_is_clamped_to_unit_range() {
        let mut p = PointerState::default();
        p.point_at(Vec2::splat(0.5));
        p.relax(5.0);
        assert_eq!(p.energy(), 1.0);
        p.relax(-3.0);
        // Negative peaks cannot push energy below zero either.
        assert!(p.energy() >= 0.0);
    }

    #[test]
    fn energy_decays_monotonically_while_inactive() {
        let mut p = PointerState::default();
        p.point_at(Vec2::splat(0.5));
        p.relax(1.0);
        p.active = false;

        let mut last = p.energy();
        for _ in 0..50 {
            p.relax(0.0);
            assert!(p.energy() <= last);
            last = p.energy();
        }
    }

    #[test]
    fn thousand_inactive_ticks_drain_energy_completely() {
        let mut p = PointerState::default();
        p.point_at(Vec2::splat(0.5));
        p.relax(1.0);
        p.active = false;

        for _ in 0..1000 {
            p.relax(0.0);
        }
        assert!(p.energy() < 1e-6);
    }

    #[test]
    fn active_energy_holds_against_a_lower_peak() {
        let mut p = PointerState::default();
        p.point_at(Vec2::splat(0.5));
        p.relax(1.0);
        // A much lower peak only lets energy fall at the hold rate.
        p.relax(0.1);
        assert_eq!(p.energy(), 0.8);
    }
}
