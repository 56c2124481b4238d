//! Loading progress bar.
//!
//! [`ProgressPresenter`] draws the loading screen's bar and status line for
//! a (stage, total) pair, presents the frame and drains pending events so
//! the window keeps responding between stages. It borrows the bar images
//! and font from the [`LoadingScreen`](super::loadingscreen::LoadingScreen).

use crate::platform::{EventPump, MediaLoader, Rect, Surface, TextAlign};

/// Receives progress updates from the load sequencer.
pub trait ProgressReporter<P: ?Sized> {
    /// `stage` stages out of `total` are complete.
    fn report(&mut self, platform: &mut P, message: &str, stage: usize, total: usize);
}

/// Screen placement of the progress bar and status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BarLayout {
    pub bar_x: i32,
    pub bar_y: i32,
    pub message: Rect,
}

impl Default for BarLayout {
    /// Placement on the 800x600 loading screen.
    fn default() -> Self {
        Self {
            bar_x: 279,
            bar_y: 453,
            message: Rect::new(310, 493, 200, 25),
        }
    }
}

/// Pixels of a `width`-wide bar to fill after `stage` of `total` stages.
///
/// Non-decreasing in `stage`, 0 at stage 0 and `width` from `stage == total`.
pub fn filled_width(width: i32, stage: usize, total: usize) -> i32 {
    if total == 0 || width <= 0 {
        return 0;
    }
    let stage = stage.min(total) as i64;
    (width as i64 * stage / total as i64) as i32
}

/// Draws the progress bar with the loading screen's images.
pub struct ProgressPresenter<'a, P: MediaLoader> {
    bar_empty: &'a P::Image,
    bar_full: &'a P::Image,
    font: &'a P::Font,
    layout: BarLayout,
}

impl<'a, P: MediaLoader> ProgressPresenter<'a, P> {
    pub fn new(
        bar_empty: &'a P::Image,
        bar_full: &'a P::Image,
        font: &'a P::Font,
        layout: BarLayout,
    ) -> Self {
        Self {
            bar_empty,
            bar_full,
            font,
            layout,
        }
    }
}

impl<P: Surface + EventPump> ProgressReporter<P> for ProgressPresenter<'_, P> {
    fn report(&mut self, platform: &mut P, message: &str, stage: usize, total: usize) {
        let BarLayout {
            bar_x,
            bar_y,
            message: area,
        } = self.layout;

        platform.draw_image(self.bar_empty, bar_x, bar_y);
        let (width, height) = platform.image_size(self.bar_full);
        let filled = filled_width(width, stage, total);
        if filled > 0 {
            platform.draw_image_part(self.bar_full, Rect::new(0, 0, filled, height), bar_x, bar_y);
        }
        platform.draw_text(message, self.font, area, TextAlign::Center);
        platform.refresh();
        platform.process_events();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::headless::{HeadlessPlatform, PlatformCall};
    use std::path::Path;

    #[test]
    fn test_filled_width_is_monotonic_and_bounded() {
        let mut last = 0;
        for stage in 0..=6 {
            let w = filled_width(260, stage, 4);
            assert!(w >= last);
            assert!(w <= 260);
            last = w;
        }
        assert_eq!(filled_width(260, 0, 4), 0);
        assert_eq!(filled_width(260, 2, 4), 130);
        assert_eq!(filled_width(260, 4, 4), 260);
        assert_eq!(filled_width(260, 1, 0), 0);
    }

    #[test]
    fn test_report_draws_one_frame_and_pumps_once() {
        let mut platform = HeadlessPlatform::new().with_image_size(260, 66);
        let empty = platform.load_image(Path::new("loader_empty.png")).unwrap();
        let full = platform.load_image(Path::new("loader_full.png")).unwrap();
        let font = platform.load_font(Path::new("arial.ttf"), 12).unwrap();
        platform.clear_calls();

        let mut presenter =
            ProgressPresenter::<HeadlessPlatform>::new(&empty, &full, &font, BarLayout::default());
        presenter.report(&mut platform, "Loading images...", 1, 4);

        assert_eq!(
            platform.calls(),
            &[
                PlatformCall::DrawImage {
                    id: empty.id,
                    x: 279,
                    y: 453
                },
                PlatformCall::DrawImagePart {
                    id: full.id,
                    src: Rect::new(0, 0, 65, 66),
                    x: 279,
                    y: 453
                },
                PlatformCall::DrawText {
                    text: "Loading images...".to_string(),
                    area: Rect::new(310, 493, 200, 25),
                    align: TextAlign::Center
                },
                PlatformCall::Refresh,
                PlatformCall::ProcessEvents,
            ]
        );
    }

    #[test]
    fn test_report_at_zero_skips_filled_overlay() {
        let mut platform = HeadlessPlatform::new();
        let empty = platform.load_image(Path::new("e.png")).unwrap();
        let full = platform.load_image(Path::new("f.png")).unwrap();
        let font = platform.load_font(Path::new("arial.ttf"), 12).unwrap();
        platform.clear_calls();

        let mut presenter =
            ProgressPresenter::<HeadlessPlatform>::new(&empty, &full, &font, BarLayout::default());
        presenter.report(&mut platform, "Loading fonts...", 0, 4);
        assert_eq!(
            platform.count(|c| matches!(c, PlatformCall::DrawImagePart { .. })),
            0
        );
    }
}
