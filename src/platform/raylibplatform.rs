//! Desktop platform on top of raylib.
//!
//! Wraps the raylib window handle, its thread token and the audio device.
//! Frames are opened lazily by the first draw call and presented by
//! [`Surface::refresh`], so the resource layer can issue draw calls without
//! holding a `RaylibDrawHandle`.
//!
//! Notes
//! - Handles are raylib's own RAII types; releasing one drops it.
//! - Sounds and music borrow the audio device, so the device must outlive
//!   the platform and every handle loaded through it.

use std::ffi::CString;
use std::path::Path;

use raylib::core::audio::{Music, RaylibAudio, Sound};
use raylib::ffi;
use raylib::prelude::*;

use crate::platform::{Asset, EventPump, MediaLoader, Rect, Surface, TextAlign, Timer};

/// Longest single wait inside [`Timer::delay`] before events are polled again.
const DELAY_SLICE_MS: u32 = 10;
const TEXT_SPACING: f32 = 1.0;

fn path_str(path: &Path) -> Result<&str, String> {
    path.to_str()
        .ok_or_else(|| format!("path '{}' is not valid UTF-8", path.display()))
}

/// raylib window, thread token and audio device.
pub struct RaylibPlatform<'aud> {
    rl: RaylibHandle,
    thread: RaylibThread,
    audio: &'aud RaylibAudio,
    frame_open: bool,
}

impl<'aud> RaylibPlatform<'aud> {
    pub fn new(rl: RaylibHandle, thread: RaylibThread, audio: &'aud RaylibAudio) -> Self {
        Self {
            rl,
            thread,
            audio,
            frame_open: false,
        }
    }

    pub fn window_should_close(&self) -> bool {
        self.rl.window_should_close()
    }

    fn begin_frame(&mut self) {
        if !self.frame_open {
            unsafe { ffi::BeginDrawing() };
            self.frame_open = true;
        }
    }
}

impl<'aud> MediaLoader for RaylibPlatform<'aud> {
    type Font = Font;
    type Image = Texture2D;
    type Sound = Sound<'aud>;
    type Music = Music<'aud>;

    fn load_font(&mut self, path: &Path, size: u32) -> Result<Font, String> {
        let path = path_str(path)?;
        self.rl
            .load_font_ex(&self.thread, path, size as i32, None)
            .map_err(|e| e.to_string())
    }

    fn load_image(&mut self, path: &Path) -> Result<Texture2D, String> {
        let path = path_str(path)?;
        self.rl
            .load_texture(&self.thread, path)
            .map_err(|e| e.to_string())
    }

    fn load_sound(&mut self, path: &Path) -> Result<Sound<'aud>, String> {
        let path = path_str(path)?;
        self.audio.new_sound(path).map_err(|e| e.to_string())
    }

    fn load_music(&mut self, path: &Path) -> Result<Music<'aud>, String> {
        let path = path_str(path)?;
        self.audio.new_music(path).map_err(|e| e.to_string())
    }

    fn release(&mut self, asset: Asset<Self>) -> Result<(), String> {
        // Each raylib handle unloads itself on drop.
        drop(asset);
        Ok(())
    }

    fn play_sound(&mut self, sound: &Sound<'aud>) {
        sound.play();
    }
}

impl Surface for RaylibPlatform<'_> {
    fn image_size(&self, image: &Texture2D) -> (i32, i32) {
        (image.width, image.height)
    }

    fn draw_image(&mut self, image: &Texture2D, x: i32, y: i32) {
        self.begin_frame();
        unsafe { ffi::DrawTexture(**image, x, y, Color::WHITE.into()) };
    }

    fn draw_image_part(&mut self, image: &Texture2D, src: Rect, x: i32, y: i32) {
        self.begin_frame();
        let source = ffi::Rectangle {
            x: src.x as f32,
            y: src.y as f32,
            width: src.width as f32,
            height: src.height as f32,
        };
        let position = ffi::Vector2 {
            x: x as f32,
            y: y as f32,
        };
        unsafe { ffi::DrawTextureRec(**image, source, position, Color::WHITE.into()) };
    }

    fn draw_text(&mut self, text: &str, font: &Font, area: Rect, align: TextAlign) {
        let Ok(c_text) = CString::new(text) else {
            log::warn!("text '{}' contains a NUL byte, not drawn", text);
            return;
        };
        self.begin_frame();
        let font_size = font.baseSize as f32;
        let measured = unsafe { ffi::MeasureTextEx(**font, c_text.as_ptr(), font_size, TEXT_SPACING) };
        let x = match align {
            TextAlign::Left => area.x as f32,
            TextAlign::Center => area.x as f32 + (area.width as f32 - measured.x) * 0.5,
            TextAlign::Right => (area.x + area.width) as f32 - measured.x,
        };
        let y = area.y as f32 + (area.height as f32 - measured.y) * 0.5;
        unsafe {
            ffi::DrawTextEx(
                **font,
                c_text.as_ptr(),
                ffi::Vector2 { x, y },
                font_size,
                TEXT_SPACING,
                Color::WHITE.into(),
            )
        };
    }

    fn refresh(&mut self) {
        self.begin_frame();
        // EndDrawing swaps buffers and polls input events.
        unsafe { ffi::EndDrawing() };
        self.frame_open = false;
    }

    fn clear(&mut self) {
        self.begin_frame();
        unsafe { ffi::ClearBackground(Color::BLACK.into()) };
    }

    fn resolution(&self) -> (i32, i32) {
        (self.rl.get_screen_width(), self.rl.get_screen_height())
    }

    fn set_resolution(&mut self, width: i32, height: i32) {
        self.rl.set_window_size(width, height);
    }
}

impl EventPump for RaylibPlatform<'_> {
    fn process_events(&mut self) {
        unsafe { ffi::PollInputEvents() };
    }
}

impl Timer for RaylibPlatform<'_> {
    fn delay(&mut self, ms: u32) {
        let mut remaining = ms;
        while remaining > 0 {
            let slice = remaining.min(DELAY_SLICE_MS);
            unsafe { ffi::WaitTime(slice as f64 / 1000.0) };
            self.process_events();
            remaining -= slice;
        }
    }
}
