pub mod render;
pub mod scale;
pub mod tooltip;

pub use render::{render, HeatmapScene, SceneCell, DEFAULT_SIZE};
pub use scale::{ColorScale, ScaleSpec};
pub use tooltip::{DomTooltip, TooltipLayer, TooltipLease, TooltipSurface};
