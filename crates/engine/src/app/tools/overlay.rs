use crate::app::rendering::{blend_rect, draw_rect_outline, draw_text, text_extent, Rgba};
use crate::app::{LoopMetricsSnapshot, Rect, SceneKey};

const TEXT_SCALE: u32 = 3;
const LINE_ADVANCE: f32 = 7.0 * TEXT_SCALE as f32;
const OVERLAY_PADDING: f32 = 6.0 * TEXT_SCALE as f32;
const OVERLAY_PANEL_INSET_X: f32 = 4.0 * TEXT_SCALE as f32;
const OVERLAY_PANEL_INSET_Y: f32 = 3.0 * TEXT_SCALE as f32;
const OVERLAY_TEXT_PRIMARY_COLOR: Rgba = [244, 248, 252, 255];
const OVERLAY_TEXT_DIM_COLOR: Rgba = [176, 198, 220, 255];
const OVERLAY_PANEL_BG_COLOR: Rgba = [10, 12, 16, 210];
const OVERLAY_PANEL_BORDER_COLOR: Rgba = [92, 106, 126, 255];
const PERF_SECTION_LABEL: &str = "Perf";
const SCENE_SECTION_LABEL: &str = "Scene";

#[derive(Debug, Clone)]
pub(crate) struct OverlayData {
    pub metrics: LoopMetricsSnapshot,
    pub render_fps_cap: Option<u32>,
    pub slow_frame_delay_ms: u64,
    pub scene: SceneKey,
    pub scene_lines: Vec<String>,
}

pub(crate) fn draw_overlay(frame: &mut [u8], width: u32, height: u32, data: &OverlayData) {
    if width == 0 || height == 0 {
        return;
    }

    let lines = build_overlay_lines(data);
    let longest_line_px = lines
        .iter()
        .map(|line| text_extent(line, TEXT_SCALE).0)
        .max()
        .unwrap_or(0);
    let panel = Rect {
        x: OVERLAY_PADDING - OVERLAY_PANEL_INSET_X,
        y: OVERLAY_PADDING - OVERLAY_PANEL_INSET_Y,
        width: longest_line_px as f32 + OVERLAY_PANEL_INSET_X * 2.0,
        height: lines.len() as f32 * LINE_ADVANCE + OVERLAY_PANEL_INSET_Y * 2.0,
    };
    blend_rect(frame, width, height, panel, OVERLAY_PANEL_BG_COLOR);
    draw_rect_outline(frame, width, height, panel, OVERLAY_PANEL_BORDER_COLOR);

    let mut y = OVERLAY_PADDING;
    for line in &lines {
        draw_text(
            frame,
            width,
            height,
            OVERLAY_PADDING as i32,
            y as i32,
            line,
            TEXT_SCALE,
            overlay_line_color(line),
        );
        y += LINE_ADVANCE;
    }
}

fn build_overlay_lines(data: &OverlayData) -> Vec<String> {
    let mut lines = vec![
        PERF_SECTION_LABEL.to_string(),
        format_fps_line(
            data.metrics.fps,
            data.render_fps_cap,
            data.slow_frame_delay_ms,
        ),
        format!("Frame: {:.2} ms", data.metrics.frame_time_ms),
        String::new(),
        SCENE_SECTION_LABEL.to_string(),
        format!("Active: {:?}", data.scene),
    ];
    lines.extend(data.scene_lines.iter().cloned());
    lines
}

fn overlay_line_color(line: &str) -> Rgba {
    if matches!(line, PERF_SECTION_LABEL | SCENE_SECTION_LABEL) {
        OVERLAY_TEXT_DIM_COLOR
    } else {
        OVERLAY_TEXT_PRIMARY_COLOR
    }
}

fn format_fps_line(current_fps: f32, cap: Option<u32>, slow_frame_delay_ms: u64) -> String {
    let cap_text = match cap {
        Some(value) => value.to_string(),
        None => "inf".to_string(),
    };
    format!(
        "[{:.0} / {}] dbg+{}ms",
        current_fps, cap_text, slow_frame_delay_ms
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data() -> OverlayData {
        OverlayData {
            metrics: LoopMetricsSnapshot {
                fps: 119.6,
                frame_time_ms: 8.36,
            },
            render_fps_cap: Some(120),
            slow_frame_delay_ms: 0,
            scene: SceneKey::Board,
            scene_lines: vec!["config: -cccmmmb".to_string(), "tasks: 0".to_string()],
        }
    }

    #[test]
    fn fps_line_formats_cap_on_and_debug_delay() {
        assert_eq!(format_fps_line(59.7, Some(60), 5), "[60 / 60] dbg+5ms");
    }

    #[test]
    fn fps_line_formats_cap_off() {
        assert_eq!(format_fps_line(240.2, None, 0), "[240 / inf] dbg+0ms");
    }

    #[test]
    fn scene_lines_follow_the_builtin_sections() {
        let lines = build_overlay_lines(&data());
        assert_eq!(lines[0], PERF_SECTION_LABEL);
        assert_eq!(lines[4], SCENE_SECTION_LABEL);
        assert_eq!(lines[5], "Active: Board");
        assert_eq!(&lines[6..], ["config: -cccmmmb", "tasks: 0"]);
    }

    #[test]
    fn draw_overlay_writes_backing_plate_pixels() {
        let width = 400;
        let height = 300;
        let mut frame = vec![0u8; (width * height * 4) as usize];
        draw_overlay(&mut frame, width, height, &data());

        let corner = ((OVERLAY_PADDING - OVERLAY_PANEL_INSET_X) as usize + 1) * 4
            + ((OVERLAY_PADDING - OVERLAY_PANEL_INSET_Y) as usize + 1) * width as usize * 4;
        assert_ne!(frame[corner..corner + 4], [0, 0, 0, 0]);
    }

    #[test]
    fn tiny_viewports_never_panic() {
        for (width, height) in [(0, 0), (1, 1), (3, 2)] {
            let mut frame = vec![0u8; (width * height * 4) as usize];
            draw_overlay(&mut frame, width, height, &data());
        }
    }
}
