use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use wastewater_dashboard::data::model::{Metric, SeriesKind};

/// Bars of the premature-death chart.
pub const DEATHS_COLOR: Color32 = Color32::from_rgb(0x00, 0x4c, 0x6d);
/// Urban wastewater line drawn against the death counts.
pub const URBAN_COLOR: Color32 = Color32::from_rgb(0xff, 0x7f, 0x0e);

/// Golden-angle hue step; consecutive metrics land far apart on the wheel.
const HUE_STEP: f32 = 137.508;
const HUE_START: f32 = 200.0;

/// `n` distinct mid-lightness colours stepping round the hue wheel.
pub fn metric_palette(n: usize) -> Vec<Color32> {
    (0..n)
        .map(|i| {
            let hue = (HUE_START + i as f32 * HUE_STEP) % 360.0;
            let rgb: Srgb = Hsl::new(hue, 0.7, 0.42).into_color();
            let [r, g, b] = [rgb.red, rgb.green, rgb.blue].map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8);
            Color32::from_rgb(r, g, b)
        })
        .collect()
}

/// One stable colour per metric so a series keeps its colour across charts.
/// The death and urban colours are fixed; the rest come from the palette.
#[derive(Debug, Clone)]
pub struct MetricColors {
    colors: [Color32; 5],
}

impl Default for MetricColors {
    fn default() -> Self {
        let palette = metric_palette(Metric::ALL.len());
        let colors = Metric::ALL.map(|m| match m {
            Metric::PrematureDeathCount => DEATHS_COLOR,
            Metric::UrbanUntreated => URBAN_COLOR,
            other => palette[other as usize],
        });
        MetricColors { colors }
    }
}

impl MetricColors {
    pub fn color_for(&self, metric: Metric) -> Color32 {
        self.colors[metric as usize]
    }

    pub fn series_color(&self, kind: SeriesKind) -> Color32 {
        self.color_for(kind.source())
    }
}
