/// Adaptive-mode animator
///
/// Two modes: free-form, where every tile keeps its own size, and uniform,
/// where every tile shows at one thumbnail size. Toggling starts a short
/// linear transition driven by a periodic tick.
use iced::time::Instant;
use std::collections::HashMap;
use std::time::Duration;

use super::data::{TargetTile, TileId, TileSize};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    FreeForm,
    Uniform,
}

#[derive(Debug)]
pub struct AdaptiveAnimator {
    mode: Mode,
    /// Last known free-form size of each tile
    reference_sizes: HashMap<TileId, TileSize>,
    /// Start of the running transition
    started_at: Option<Instant>,
    duration: Duration,
    uniform_size: TileSize,
}

impl AdaptiveAnimator {
    pub fn new(uniform_size: TileSize, duration: Duration) -> Self {
        Self {
            mode: Mode::FreeForm,
            reference_sizes: HashMap::new(),
            started_at: None,
            duration,
            uniform_size,
        }
    }

    pub fn is_uniform(&self) -> bool {
        self.mode == Mode::Uniform
    }

    pub fn uniform_size(&self) -> TileSize {
        self.uniform_size
    }

    /// Whether a transition still needs ticks
    pub fn is_running(&self) -> bool {
        self.started_at.is_some()
    }

    /// Record `size` as the free-form size of a tile
    pub fn track(&mut self, id: TileId, size: TileSize) {
        self.reference_sizes.insert(id, size);
    }

    #[cfg(test)]
    pub fn reference_size(&self, id: TileId) -> Option<TileSize> {
        self.reference_sizes.get(&id).copied()
    }

    pub fn forget(&mut self, id: TileId) {
        self.reference_sizes.remove(&id);
    }

    pub fn clear(&mut self) {
        self.reference_sizes.clear();
    }

    /// Flip the mode and (re)start the transition at `now`.
    ///
    /// Tiles without a reference size get their current size recorded first,
    /// so repeated toggles always return to the same free-form size.
    pub fn toggle(&mut self, now: Instant, tiles: &[TargetTile]) -> Mode {
        self.mode = match self.mode {
            Mode::FreeForm => Mode::Uniform,
            Mode::Uniform => Mode::FreeForm,
        };

        for tile in tiles {
            self.reference_sizes.entry(tile.id).or_insert(tile.size);
        }

        self.started_at = Some(now);
        tracing::info!(mode = ?self.mode, tiles = tiles.len(), "adaptive mode toggled");
        self.mode
    }

    /// Advance the transition to `now`, resizing every tile.
    ///
    /// Returns `true` while more ticks are needed. On the final tick every
    /// tile lands exactly on its target size.
    pub fn tick(&mut self, now: Instant, tiles: &mut [TargetTile]) -> bool {
        let Some(started_at) = self.started_at else {
            return false;
        };

        let progress = self.progress(now, started_at);
        for tile in tiles.iter_mut() {
            let reference = *self.reference_sizes.entry(tile.id).or_insert(tile.size);
            let (from, to) = match self.mode {
                Mode::Uniform => (reference, self.uniform_size),
                Mode::FreeForm => (self.uniform_size, reference),
            };
            tile.size = interpolate(from, to, progress);
        }

        if progress >= 1.0 {
            self.started_at = None;
            tracing::debug!(mode = ?self.mode, "adaptive transition finished");
            return false;
        }
        true
    }

    fn progress(&self, now: Instant, started_at: Instant) -> f32 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_duration_since(started_at);
        (elapsed.as_secs_f32() / self.duration.as_secs_f32()).min(1.0)
    }
}

fn interpolate(from: TileSize, to: TileSize, progress: f32) -> TileSize {
    if progress >= 1.0 {
        return to;
    }
    let lerp = |a: u32, b: u32| {
        let value = a as f32 + (b as f32 - a as f32) * progress;
        (value as u32).max(1)
    };
    TileSize::new(lerp(from.width, to.width), lerp(from.height, to.height))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::data::fixtures::tile;
    use crate::state::data::TilePosition;

    const UNIFORM: TileSize = TileSize::new(120, 120);

    fn animator() -> AdaptiveAnimator {
        AdaptiveAnimator::new(UNIFORM, Duration::from_millis(100))
    }

    fn tiles() -> Vec<TargetTile> {
        vec![
            tile(1, TileSize::new(300, 150), TilePosition::new(0, 0)),
            tile(2, TileSize::new(60, 90), TilePosition::new(310, 0)),
        ]
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_toggle_converges_to_uniform() {
        let mut animator = animator();
        let mut tiles = tiles();
        let t0 = Instant::now();

        assert_eq!(animator.toggle(t0, &tiles), Mode::Uniform);
        assert!(animator.tick(t0 + ms(50), &mut tiles));
        assert_eq!(tiles[0].size, TileSize::new(210, 135));

        assert!(!animator.tick(t0 + ms(150), &mut tiles));
        assert!(!animator.is_running());
        assert!(tiles.iter().all(|t| t.size == UNIFORM));
    }

    #[test]
    fn test_toggle_back_restores_free_form_sizes() {
        let mut animator = animator();
        let mut tiles = tiles();
        let t0 = Instant::now();

        animator.toggle(t0, &tiles);
        animator.tick(t0 + ms(100), &mut tiles);
        animator.toggle(t0 + ms(200), &tiles);
        animator.tick(t0 + ms(300), &mut tiles);

        assert_eq!(tiles[0].size, TileSize::new(300, 150));
        assert_eq!(tiles[1].size, TileSize::new(60, 90));
    }

    #[test]
    fn test_double_toggle_mid_transition_converges() {
        let mut animator = animator();
        let mut tiles = tiles();
        let t0 = Instant::now();

        animator.toggle(t0, &tiles);
        animator.tick(t0 + ms(30), &mut tiles);
        assert_ne!(tiles[0].size, UNIFORM);

        // Second toggle before the first finished: back to free-form
        assert_eq!(animator.toggle(t0 + ms(40), &tiles), Mode::FreeForm);
        let mut now = t0 + ms(40);
        while animator.tick(now, &mut tiles) {
            now += ms(10);
        }

        assert_eq!(tiles[0].size, TileSize::new(300, 150));
        assert_eq!(tiles[1].size, TileSize::new(60, 90));
    }

    #[test]
    fn test_triple_toggle_ends_uniform() {
        let mut animator = animator();
        let mut tiles = tiles();
        let t0 = Instant::now();

        animator.toggle(t0, &tiles);
        animator.tick(t0 + ms(20), &mut tiles);
        animator.toggle(t0 + ms(30), &tiles);
        animator.tick(t0 + ms(40), &mut tiles);
        animator.toggle(t0 + ms(50), &tiles);
        animator.tick(t0 + ms(500), &mut tiles);

        assert!(tiles.iter().all(|t| t.size == UNIFORM));
        assert!(!animator.is_running());
    }

    #[test]
    fn test_tiles_added_mid_transition_get_a_reference() {
        let mut animator = animator();
        let mut tiles = tiles();
        let t0 = Instant::now();

        animator.toggle(t0, &tiles);
        tiles.push(tile(3, TileSize::new(40, 40), TilePosition::new(0, 200)));
        animator.tick(t0 + ms(100), &mut tiles);

        assert_eq!(animator.reference_size(TileId(3)), Some(TileSize::new(40, 40)));
        assert_eq!(tiles[2].size, UNIFORM);
    }

    #[test]
    fn test_removed_tiles_do_not_break_ticks() {
        let mut animator = animator();
        let mut tiles = tiles();
        let t0 = Instant::now();

        animator.toggle(t0, &tiles);
        animator.forget(TileId(1));
        tiles.remove(0);
        assert!(!animator.tick(t0 + ms(100), &mut tiles));
        assert_eq!(tiles[0].size, UNIFORM);
    }

    #[test]
    fn test_tick_without_toggle_is_a_no_op() {
        let mut animator = animator();
        let mut tiles = tiles();
        assert!(!animator.tick(Instant::now(), &mut tiles));
        assert_eq!(tiles[0].size, TileSize::new(300, 150));
    }

    #[test]
    fn test_zero_duration_snaps() {
        let mut animator = AdaptiveAnimator::new(UNIFORM, Duration::ZERO);
        let mut tiles = tiles();
        let t0 = Instant::now();
        animator.toggle(t0, &tiles);
        assert!(!animator.tick(t0, &mut tiles));
        assert!(tiles.iter().all(|t| t.size == UNIFORM));
    }
}
