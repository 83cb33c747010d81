//! Runtime tunables. Everything here is presentation or persistence detail;
//! none of it affects the pour rules.

#[derive(Clone, Debug, PartialEq)]
pub struct GameConfig {
    /// Key under which the current catalog level index is persisted.
    pub storage_key: &'static str,
    /// Pause between the winning move and the win dialog.
    pub win_delay_ms: u32,
    /// How long a toast stays visible.
    pub toast_dismiss_ms: u32,
    // Cup body size = base + capacity * per-unit factor (px)
    pub cup_base_height_px: u32,
    pub cup_height_per_unit_px: u32,
    pub cup_base_width_px: u32,
    pub cup_width_per_unit_px: u32,
    /// Capacities above this are drawn at this size.
    pub cup_max_render_units: u32,
    /// Pre-filled values of the custom-level form: cup 1, cup 2, target.
    pub custom_defaults: [&'static str; 3],
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            storage_key: "waterPourLevel",
            win_delay_ms: 500,
            toast_dismiss_ms: 2000,
            cup_base_height_px: 80,
            cup_height_per_unit_px: 12,
            cup_base_width_px: 70,
            cup_width_per_unit_px: 6,
            cup_max_render_units: 30,
            custom_defaults: ["5", "3", "4"],
        }
    }
}

impl GameConfig {
    /// Rendered (width, height) of a cup body in pixels. Custom levels accept
    /// any positive capacity, so the size is capped.
    pub fn cup_body_size(&self, capacity: u32) -> (u32, u32) {
        let units = capacity.min(self.cup_max_render_units);
        (
            self.cup_base_width_px
                .saturating_add(units.saturating_mul(self.cup_width_per_unit_px)),
            self.cup_base_height_px
                .saturating_add(units.saturating_mul(self.cup_height_per_unit_px)),
        )
    }
}
