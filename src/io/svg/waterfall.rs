//! Waterfall chart export.

use std::io::Write;

use anyhow::Result;

use crate::chart::{WaterfallChart, NET_BALANCE_LABEL};
use super::{color::{step_color, total_color, Rgb}, writer::{escape, write_svg_footer, write_svg_header, write_svg_styles}};

const TITLE: &str = "Blue-Green-Infrastructure Balance";
const BAR_WIDTH: f64 = 48.0;
const BAR_GAP: f64 = 16.0;
const MARGIN_LEFT: f64 = 60.0;
const MARGIN_RIGHT: f64 = 40.0;
const MARGIN_TOP: f64 = 80.0;
const PLOT_HEIGHT: f64 = 360.0;
const MARGIN_BOTTOM: f64 = 220.0;

/// Vertical mapping from balance values to SVG coordinates.
struct Scale {
    hi: f64,
    span: f64,
}

impl Scale {
    fn new((lo, hi): (f64, f64)) -> Self {
        let span = if hi > lo { hi - lo } else { 1.0 };
        Self { hi, span }
    }

    fn y(&self, value: f64) -> f64 {
        MARGIN_TOP + (self.hi - value) / self.span * PLOT_HEIGHT
    }
}

/// Render `chart` as a standalone SVG document.
pub(crate) fn write_waterfall_svg<W: Write>(chart: &WaterfallChart, writer: &mut W) -> Result<()> {
    let slots = chart.bars.len() + 1;
    let width = MARGIN_LEFT + slots as f64 * (BAR_WIDTH + BAR_GAP) + MARGIN_RIGHT;
    let height = MARGIN_TOP + PLOT_HEIGHT + MARGIN_BOTTOM;
    let scale = Scale::new(chart.value_range());

    write_svg_header(writer, width, height)?;
    write_svg_styles(writer)?;
    writeln!(writer, r#"<text class="title" x="{MARGIN_LEFT}" y="40">{TITLE}</text>"#)?;

    // Zero line across the plot.
    let zero = scale.y(0.0);
    writeln!(writer, r#"<line class="axis" x1="{MARGIN_LEFT}" y1="{zero:.2}" x2="{:.2}" y2="{zero:.2}"/>"#, width - MARGIN_RIGHT)?;

    for (i, bar) in chart.bars.iter().enumerate() {
        write_bar(writer, &scale, i, &bar.label, bar.start, bar.end(), step_color(bar.value))?;

        // Dotted connector from this bar's end to the next bar.
        let x_end = slot_x(i) + BAR_WIDTH;
        let y_end = scale.y(bar.end());
        writeln!(writer, r#"<line class="connector" x1="{x_end:.2}" y1="{y_end:.2}" x2="{:.2}" y2="{y_end:.2}"/>"#, x_end + BAR_GAP)?;
    }
    write_bar(writer, &scale, chart.bars.len(), NET_BALANCE_LABEL, 0.0, chart.net_balance, total_color(chart.net_balance))?;

    write_svg_footer(writer)
}

fn slot_x(slot: usize) -> f64 {
    MARGIN_LEFT + slot as f64 * (BAR_WIDTH + BAR_GAP) + BAR_GAP / 2.0
}

fn write_bar<W: Write>(writer: &mut W, scale: &Scale, slot: usize, label: &str, from: f64, to: f64, fill: Rgb) -> Result<()> {
    let x = slot_x(slot);
    let top = scale.y(from.max(to));
    let bar_height = (scale.y(from) - scale.y(to)).abs();
    writeln!(writer, r#"<rect x="{x:.2}" y="{top:.2}" width="{BAR_WIDTH}" height="{bar_height:.2}" fill="{fill}"><title>{}</title></rect>"#, escape(label))?;

    let cx = x + BAR_WIDTH / 2.0;
    writeln!(writer, r#"<text x="{cx:.2}" y="{:.2}" text-anchor="middle">{:.1}</text>"#, top - 6.0, to - from)?;

    let ly = MARGIN_TOP + PLOT_HEIGHT + 16.0;
    writeln!(writer, r#"<text x="{cx:.2}" y="{ly:.2}" transform="rotate(40 {cx:.2} {ly:.2})">{}</text>"#, escape(label))?;
    Ok(())
}
