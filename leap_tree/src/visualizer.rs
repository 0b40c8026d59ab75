//! Software-rendered visualizer using `minifb`.
//!
//! A stand-in for a real 3D renderer: every object is projected through a
//! pinhole camera and drawn as a flat shape, far to near.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │ TREE  target -  pointer +0.12 -0.05  fist     tracking   │
//! │                                                          │
//! │                 ·  dust  ·        ● ornaments            │
//! │                      ▲▲▲  tree  ▲▲▲    ▮ candies         │
//! │                   ▲▲▲▲▲▲▲▲▲▲▲▲▲▲▲▲▲    ▭ photos          │
//! │                                                          │
//! │ key legend                                               │
//! └──────────────────────────────────────────────────────────┘
//! ```

use std::sync::mpsc::Sender;

use glam::{Quat, Vec3};
use minifb::{Key, KeyRepeat, MouseMode, Window, WindowOptions};

use hand_gesture::HandPose;
use tree_scene::{Category, ManagedObject, Mode};

use crate::error::AppError;
use crate::scheduler::{FramePresenter, SceneView};
use crate::source::SimInput;

// ════════════════════════════════════════════════════════════════════════════
// Layout constants
// ════════════════════════════════════════════════════════════════════════════

pub const WIN_W:       usize = 960;
pub const WIN_H:       usize = 640;
const HUD_H:           usize = 18;
const LEGEND_Y:        usize = WIN_H - 12;
const BG_COLOR:        u32   = 0xFF05070D;
const HUD_BG:          u32   = 0xFF0F3460;
const DUST_COLOR:      u32   = 0xFF3A3F4F;
const ORNAMENT_COLOR:  u32   = 0xFFD4AF37;  // gold
const CANDY_COLOR:     u32   = 0xFFE8E8E8;
const CANDY_STRIPE:    u32   = 0xFFC0262D;
const PHOTO_BORDER:    u32   = 0xFFF5F0E6;
const FOCUS_COLOR:     u32   = 0xFFFFD700;

/// Camera sits on +Z looking down −Z.
const CAMERA_EYE:      Vec3  = Vec3::new(0.0, 2.0, 50.0);
const FOV_Y_DEG:       f32   = 45.0;
const NEAR:            f32   = 1.0;

// ════════════════════════════════════════════════════════════════════════════
// Projection
// ════════════════════════════════════════════════════════════════════════════

/// Pinhole projection of a world point: screen x, screen y, depth.
fn project(p: Vec3) -> Option<(f32, f32, f32)> {
    let depth = CAMERA_EYE.z - p.z;
    if depth < NEAR {
        return None;
    }
    let focal = (WIN_H as f32 / 2.0) / (FOV_Y_DEG.to_radians() / 2.0).tan();
    let sx = WIN_W as f32 / 2.0 + focal * (p.x - CAMERA_EYE.x) / depth;
    let sy = WIN_H as f32 / 2.0 - focal * (p.y - CAMERA_EYE.y) / depth;
    Some((sx, sy, depth))
}

/// World-space length `len` at `depth`, in pixels.
fn screen_len(len: f32, depth: f32) -> f32 {
    let focal = (WIN_H as f32 / 2.0) / (FOV_Y_DEG.to_radians() / 2.0).tan();
    focal * len / depth
}

// ════════════════════════════════════════════════════════════════════════════
// Visualizer
// ════════════════════════════════════════════════════════════════════════════

pub struct Visualizer {
    window:     Window,
    buf:        Vec<u32>,
    /// Present only when the keyboard simulator is the landmark source.
    sim_tx:     Option<Sender<SimInput>>,
    last_mouse: Option<(f32, f32)>,
    uploads:    usize,
}

impl Visualizer {
    pub fn new(sim_tx: Option<Sender<SimInput>>) -> Result<Self, AppError> {
        let mut window = Window::new(
            "Leap Tree — gesture-driven ornaments",
            WIN_W, WIN_H,
            WindowOptions {
                resize: false,
                ..WindowOptions::default()
            },
        ).map_err(|e| AppError::Window(e.to_string()))?;

        window.limit_update_rate(Some(std::time::Duration::from_millis(16))); // ~60fps

        Ok(Visualizer {
            window,
            buf: vec![BG_COLOR; WIN_W * WIN_H],
            sim_tx,
            last_mouse: None,
            uploads: 0,
        })
    }

    fn send(&self, input: SimInput) {
        if let Some(tx) = &self.sim_tx {
            let _ = tx.send(input);
        }
    }

    /// Poll keyboard and mouse.  Returns false when the user quits.
    fn poll_input(&mut self) -> bool {
        if !self.window.is_open() { return false; }

        let pressed = |k: Key| self.window.is_key_pressed(k, KeyRepeat::No);

        if pressed(Key::Q) || pressed(Key::Escape) {
            self.send(SimInput::Quit);
            return false;
        }

        let poses = [
            (Key::F, HandPose::Fist),
            (Key::O, HandPose::Open),
            (Key::P, HandPose::Pinch),
            (Key::R, HandPose::Relaxed),
        ];
        for (key, pose) in poses {
            if pressed(key) {
                self.send(SimInput::Pose(pose));
            }
        }
        if pressed(Key::H) {
            self.send(SimInput::ToggleHand);
        }
        if pressed(Key::U) {
            self.uploads += 1;
        }

        // Mouse position stands in for the palm centre.
        if let Some(pos) = self.window.get_mouse_pos(MouseMode::Clamp) {
            if self.last_mouse != Some(pos) {
                self.last_mouse = Some(pos);
                let palm = glam::Vec2::new(pos.0 / WIN_W as f32, pos.1 / WIN_H as f32);
                self.send(SimInput::Palm(palm));
            }
        }

        true
    }

    /// Render one frame.
    fn render(&mut self, view: &SceneView<'_>) {
        self.buf.fill(BG_COLOR);

        let group = view.scene.group.as_quat();

        // ── Dust ──────────────────────────────────────────────────────────
        let dust_rot = Quat::from_rotation_y(view.scene.dust.rotation_y);
        for &p in view.scene.dust.points() {
            if let Some((sx, sy, _)) = project(dust_rot * p) {
                self.set_pixel_f(sx, sy, DUST_COLOR);
            }
        }

        // ── Objects, far to near ──────────────────────────────────────────
        let focus = view.state.focus_target().filter(|_| view.state.mode() == Mode::Focus);
        let mut visible: Vec<(usize, f32, f32, f32)> = view.scene.objects().iter().enumerate()
            .filter_map(|(i, o)| {
                project(group * o.transform.position).map(|(sx, sy, d)| (i, sx, sy, d))
            })
            .collect();
        visible.sort_by(|a, b| b.3.total_cmp(&a.3));

        for (i, sx, sy, depth) in visible {
            let object = &view.scene.objects()[i];
            let focused = focus.map(|id| id.0) == Some(i);
            self.draw_object(object, sx, sy, depth, focused);
        }

        // ── HUD ───────────────────────────────────────────────────────────
        self.fill_rect(0, 0, WIN_W, HUD_H, HUD_BG);
        let target = match view.state.focus_target() {
            Some(id) => id.0.to_string(),
            None     => "-".to_string(),
        };
        let gesture = view.reading.map_or("-", |r| r.gesture.name());
        let pointer = view.state.pointer();
        let hud = format!(
            "{}  target {}  pointer {:+.2} {:+.2}  {}  {}  objects {}",
            view.state.mode().name(), target, pointer.x, pointer.y,
            gesture, view.tracking.name(), view.scene.len(),
        );
        self.draw_label(&hud, 8, 6, 0xFFEEEEEE);

        let legend = if self.sim_tx.is_some() {
            "F=fist  O=open  P=pinch  R=relaxed  H=hand  mouse=palm  U=upload  Q=quit"
        } else {
            "U=upload  Q=quit"
        };
        self.draw_label(legend, 8, LEGEND_Y, 0xFF888888);

        self.window.update_with_buffer(&self.buf, WIN_W, WIN_H).ok();
    }

    fn draw_object(&mut self, object: &ManagedObject, sx: f32, sy: f32, depth: f32, focused: bool) {
        let scale = object.transform.scale;
        match object.category() {
            Category::Ornament => {
                let r = screen_len(scale.x, depth).max(1.0);
                let shade = blend(ORNAMENT_COLOR, 0xFF000000, ((depth - 30.0) / 60.0).clamp(0.0, 0.6));
                self.fill_disc(sx, sy, r, shade);
            }
            Category::Candy => {
                let w = screen_len(scale.x * 0.5, depth).max(1.0);
                let h = screen_len(scale.y * 2.0, depth).max(2.0);
                self.fill_rect_f(sx - w / 2.0, sy - h / 2.0, w, h, CANDY_COLOR);
                let stripes = (h / 4.0) as usize;
                for k in (0..stripes).step_by(2) {
                    self.fill_rect_f(sx - w / 2.0, sy - h / 2.0 + k as f32 * 4.0, w, 2.0, CANDY_STRIPE);
                }
            }
            Category::Photo => {
                let w = screen_len(scale.x * 2.0, depth).max(2.0);
                let h = screen_len(scale.y * 2.0, depth).max(2.0);
                let fill = object.texture().map_or(0xFF808080, |t| texture_color(t.0));
                let border = if focused { FOCUS_COLOR } else { PHOTO_BORDER };
                self.fill_rect_f(sx - w / 2.0, sy - h / 2.0, w, h, border);
                let pad = (w * 0.08).max(1.0);
                self.fill_rect_f(sx - w / 2.0 + pad, sy - h / 2.0 + pad, w - 2.0 * pad, h - 2.0 * pad, fill);
            }
        }
    }

    // ── Primitive drawing helpers ─────────────────────────────────────────

    fn fill_rect(&mut self, x: usize, y: usize, w: usize, h: usize, color: u32) {
        for row in y..(y+h).min(WIN_H) {
            for col in x..(x+w).min(WIN_W) {
                self.buf[row * WIN_W + col] = color;
            }
        }
    }

    /// `fill_rect` for unclipped float coordinates.
    fn fill_rect_f(&mut self, x: f32, y: f32, w: f32, h: f32, color: u32) {
        let x0 = x.max(0.0);
        let y0 = y.max(0.0);
        let x1 = (x + w).min(WIN_W as f32);
        let y1 = (y + h).min(WIN_H as f32);
        if x1 <= x0 || y1 <= y0 { return; }
        self.fill_rect(x0 as usize, y0 as usize, (x1 - x0).ceil() as usize, (y1 - y0).ceil() as usize, color);
    }

    fn fill_disc(&mut self, cx: f32, cy: f32, r: f32, color: u32) {
        let y0 = (cy - r).floor().max(0.0) as usize;
        let y1 = (cy + r).ceil().min(WIN_H as f32 - 1.0);
        if y1 < 0.0 { return; }
        for row in y0..=y1 as usize {
            let dy = row as f32 + 0.5 - cy;
            let half = (r * r - dy * dy).max(0.0).sqrt();
            self.fill_rect_f(cx - half, row as f32, 2.0 * half, 1.0, color);
        }
    }

    fn set_pixel(&mut self, x: usize, y: usize, color: u32) {
        if x < WIN_W && y < WIN_H {
            self.buf[y * WIN_W + x] = color;
        }
    }

    fn set_pixel_f(&mut self, x: f32, y: f32, color: u32) {
        if x >= 0.0 && y >= 0.0 {
            self.set_pixel(x as usize, y as usize, color);
        }
    }

    /// Minimal bitmap font — 3×5 characters, each encoded as 5 rows × 3 bits.
    fn draw_label(&mut self, text: &str, x: usize, y: usize, color: u32) {
        let mut cx = x;
        for ch in text.chars() {
            let glyph = char_glyph(ch);
            for (row, &bits) in glyph.iter().enumerate() {
                for col in 0..3usize {
                    if bits & (1 << (2 - col)) != 0 {
                        self.set_pixel(cx + col, y + row, color);
                    }
                }
            }
            cx += 4; // 3 wide + 1 gap
            if cx + 4 > WIN_W { break; }
        }
    }
}

impl FramePresenter for Visualizer {
    fn present(&mut self, view: SceneView<'_>) -> bool {
        if !self.poll_input() {
            return false;
        }
        self.render(&view);
        self.window.is_open()
    }

    fn take_uploads(&mut self) -> usize {
        std::mem::take(&mut self.uploads)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Minimal 3×5 bitmap font
// ────────────────────────────────────────────────────────────────────────────

fn char_glyph(c: char) -> [u8; 5] {
    match c {
        '0' => [0b111, 0b101, 0b101, 0b101, 0b111],
        '1' => [0b010, 0b110, 0b010, 0b010, 0b111],
        '2' => [0b111, 0b001, 0b111, 0b100, 0b111],
        '3' => [0b111, 0b001, 0b111, 0b001, 0b111],
        '4' => [0b101, 0b101, 0b111, 0b001, 0b001],
        '5' => [0b111, 0b100, 0b111, 0b001, 0b111],
        '6' => [0b111, 0b100, 0b111, 0b101, 0b111],
        '7' => [0b111, 0b001, 0b001, 0b001, 0b001],
        '8' => [0b111, 0b101, 0b111, 0b101, 0b111],
        '9' => [0b111, 0b101, 0b111, 0b001, 0b111],
        'a' | 'A' => [0b111, 0b101, 0b111, 0b101, 0b101],
        'b' | 'B' => [0b110, 0b101, 0b110, 0b101, 0b110],
        'c' | 'C' => [0b111, 0b100, 0b100, 0b100, 0b111],
        'd' | 'D' => [0b110, 0b101, 0b101, 0b101, 0b110],
        'e' | 'E' => [0b111, 0b100, 0b111, 0b100, 0b111],
        'f' | 'F' => [0b111, 0b100, 0b111, 0b100, 0b100],
        'g' | 'G' => [0b111, 0b100, 0b101, 0b101, 0b111],
        'h' | 'H' => [0b101, 0b101, 0b111, 0b101, 0b101],
        'i' | 'I' => [0b111, 0b010, 0b010, 0b010, 0b111],
        'j' | 'J' => [0b001, 0b001, 0b001, 0b101, 0b111],
        'k' | 'K' => [0b101, 0b101, 0b110, 0b101, 0b101],
        'l' | 'L' => [0b100, 0b100, 0b100, 0b100, 0b111],
        'm' | 'M' => [0b101, 0b111, 0b101, 0b101, 0b101],
        'n' | 'N' => [0b111, 0b101, 0b101, 0b101, 0b101],
        'o' | 'O' => [0b111, 0b101, 0b101, 0b101, 0b111],
        'p' | 'P' => [0b111, 0b101, 0b111, 0b100, 0b100],
        'q' | 'Q' => [0b111, 0b101, 0b101, 0b111, 0b001],
        'r' | 'R' => [0b110, 0b101, 0b110, 0b101, 0b101],
        's' | 'S' => [0b111, 0b100, 0b111, 0b001, 0b111],
        't' | 'T' => [0b111, 0b010, 0b010, 0b010, 0b010],
        'u' | 'U' => [0b101, 0b101, 0b101, 0b101, 0b111],
        'v' | 'V' => [0b101, 0b101, 0b101, 0b010, 0b010],
        'w' | 'W' => [0b101, 0b101, 0b101, 0b111, 0b101],
        'x' | 'X' => [0b101, 0b101, 0b010, 0b101, 0b101],
        'y' | 'Y' => [0b101, 0b101, 0b111, 0b010, 0b010],
        'z' | 'Z' => [0b111, 0b001, 0b010, 0b100, 0b111],
        '/' => [0b001, 0b001, 0b010, 0b100, 0b100],
        '-' => [0b000, 0b000, 0b111, 0b000, 0b000],
        '.' => [0b000, 0b000, 0b000, 0b000, 0b010],
        ',' => [0b000, 0b000, 0b000, 0b010, 0b100],
        ':' => [0b000, 0b010, 0b000, 0b010, 0b000],
        '=' => [0b000, 0b111, 0b000, 0b111, 0b000],
        '+' => [0b000, 0b010, 0b111, 0b010, 0b000],
        ' ' => [0b000, 0b000, 0b000, 0b000, 0b000],
        _   => [0b000, 0b000, 0b010, 0b000, 0b000], // fallback dot
    }
}

/// Stand-in for a photo's pixels: a stable colour per texture id, hues
/// spaced by the golden angle so neighbours differ.
fn texture_color(id: u32) -> u32 {
    let hue = (id as f32 * 137.507_77) % 360.0;
    hsv_to_argb(hue, 0.55, 0.85)
}

fn hsv_to_argb(h: f32, s: f32, v: f32) -> u32 {
    let c = v * s;
    let x = c * (1.0 - ((h / 60.0) % 2.0 - 1.0).abs());
    let m = v - c;
    let (r, g, b) = match (h / 60.0) as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let to8 = |f: f32| (((f + m) * 255.0).round() as u32).min(255);
    0xFF000000 | (to8(r) << 16) | (to8(g) << 8) | to8(b)
}

/// Alpha-blend two ARGB colors. `t` = 0.0 → all `a`, `t` = 1.0 → all `b`.
fn blend(a: u32, b: u32, t: f32) -> u32 {
    let t = t.clamp(0.0, 1.0);
    let lerp = |ca: u32, cb: u32| (ca as f32 * (1.0-t) + cb as f32 * t) as u32;
    let ar = (a >> 16) & 0xFF; let br = (b >> 16) & 0xFF;
    let ag = (a >>  8) & 0xFF; let bg = (b >>  8) & 0xFF;
    let ab =  a        & 0xFF; let bb =  b        & 0xFF;
    0xFF000000 | (lerp(ar,br) << 16) | (lerp(ag,bg) << 8) | lerp(ab,bb)
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn camera_axis_lands_mid_screen() {
        let (sx, sy, d) = project(Vec3::new(0.0, 2.0, 0.0)).unwrap();
        assert!((sx - WIN_W as f32 / 2.0).abs() < 1e-3);
        assert!((sy - WIN_H as f32 / 2.0).abs() < 1e-3);
        assert_eq!(d, 50.0);
    }

    #[test]
    fn points_behind_camera_are_culled() {
        assert!(project(Vec3::new(0.0, 0.0, 60.0)).is_none());
        assert!(project(Vec3::new(0.0, 0.0, 49.5)).is_none());
    }

    #[test]
    fn up_is_up_on_screen() {
        let (_, high, _) = project(Vec3::new(0.0, 10.0, 0.0)).unwrap();
        let (_, low, _)  = project(Vec3::new(0.0, -10.0, 0.0)).unwrap();
        assert!(high < low);
    }

    #[test]
    fn focus_photo_fills_much_of_the_view() {
        // 1.2 × 4.5 wide photo at the focus point, 15 units from the eye.
        let w = screen_len(1.2 * 4.5 * 2.0, 15.0);
        assert!(w > WIN_W as f32 * 0.5, "{w}");
    }

    #[test]
    fn texture_colors_are_opaque_and_distinct() {
        let a = texture_color(0);
        let b = texture_color(1);
        assert_eq!(a >> 24, 0xFF);
        assert_ne!(a, b);
    }

    #[test]
    fn blend_endpoints() {
        assert_eq!(blend(0xFF102030, 0xFFFFFFFF, 0.0), 0xFF102030);
        assert_eq!(blend(0xFF102030, 0xFFFFFFFF, 1.0), 0xFFFFFFFF);
    }
}
