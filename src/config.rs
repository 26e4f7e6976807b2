//! Page-wide settings. Defaults reproduce the look of the portfolio page the
//! script was written for; everything is overridable before `start`.

use crate::error::{Error, Result};

#[derive(Clone, Debug, PartialEq)]
pub struct RevealConfig {
    pub selector: String,
    pub bar_selector: String,
    /// Attribute on each bar holding its target width (e.g. `"80%"`).
    pub bar_value_attr: String,
    pub active_class: String,
    pub activate_above: f64,
    pub deactivate_below: f64,
    /// Ratios at which the host reports visibility changes.
    pub observer_thresholds: Vec<f64>,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            selector: ".reveal".into(),
            bar_selector: ".bar div".into(),
            bar_value_attr: "data-value".into(),
            active_class: "active".into(),
            activate_above: 0.15,
            deactivate_below: 0.05,
            observer_thresholds: vec![0.0, 0.05, 0.15, 0.3, 0.5, 0.7, 1.0],
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rgb(pub u8, pub u8, pub u8);

#[derive(Clone, Debug, PartialEq)]
pub struct BackgroundConfig {
    pub canvas_id: String,
    pub shape_count: usize,
    /// Distance past the viewport edge before a shape wraps around.
    pub margin: f64,
    pub min_size: f64,
    pub size_span: f64,
    pub min_sides: u32,
    /// Number of distinct side counts, starting at `min_sides`.
    pub side_variants: u32,
    pub max_speed: f64,
    pub max_spin: f64,
    pub min_alpha: f64,
    pub alpha_span: f64,
    pub color: Rgb,
    pub line_width: f64,
}

impl Default for BackgroundConfig {
    fn default() -> Self {
        Self {
            canvas_id: "bg-geo".into(),
            shape_count: 40,
            margin: 120.0,
            min_size: 15.0,
            size_span: 30.0,
            min_sides: 3,
            side_variants: 4,
            max_speed: 0.15,
            max_spin: 0.0006,
            min_alpha: 0.15,
            alpha_span: 0.25,
            color: Rgb(0, 255, 140),
            line_width: 1.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct InteractionConfig {
    pub scroll_hint: String,
    pub scroll_target: String,
    pub nav_anchors: String,
    pub copy_control: String,
    pub copy_wrapper: String,
    pub copy_address: String,
    pub copied_label: String,
    pub restore_label_ms: i32,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            scroll_hint: ".scroll-hint".into(),
            scroll_target: "#skills".into(),
            nav_anchors: r##"nav a[href^="#"]"##.into(),
            copy_control: ".copy-mail".into(),
            copy_wrapper: ".mail-wrapper".into(),
            copy_address: ".mail-address".into(),
            copied_label: "Copied!".into(),
            restore_label_ms: 1400,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct PageConfig {
    pub reveal: RevealConfig,
    pub background: BackgroundConfig,
    pub interactions: InteractionConfig,
}

impl PageConfig {
    pub fn validate(&self) -> Result<()> {
        let r = &self.reveal;
        let unit = 0.0..=1.0;
        if !unit.contains(&r.activate_above) || !unit.contains(&r.deactivate_below) {
            return Err(Error::InvalidConfig("reveal thresholds must lie in [0, 1]"));
        }
        if r.deactivate_below >= r.activate_above {
            return Err(Error::InvalidConfig(
                "deactivate threshold must be below activate threshold",
            ));
        }
        let b = &self.background;
        if b.min_sides < 3 || b.side_variants == 0 {
            return Err(Error::InvalidConfig("shapes need at least 3 sides"));
        }
        if b.margin < 0.0 {
            return Err(Error::InvalidConfig("margin must be non-negative"));
        }
        if self.interactions.restore_label_ms < 0 {
            return Err(Error::InvalidConfig("label restore delay must be non-negative"));
        }
        Ok(())
    }
}
