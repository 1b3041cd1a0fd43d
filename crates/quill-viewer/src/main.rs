//! Interactive viewer for the quill path renderer.
//!
//! Draws a demo scene (overlapping fills, curves, a self-intersecting star
//! under both fill rules, a clipped group and optional typeset text). Click a
//! shape to log the path ID under the cursor.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, WindowEvent};
use winit::keyboard::{Key, NamedKey};

use quill_engine::coords::{Mat4, Rect, StTransform, Vec2};
use quill_engine::core::{App, AppControl, FrameCtx, WindowCtx};
use quill_engine::device::GpuInit;
use quill_engine::logging::{init_logging, LoggingConfig};
use quill_engine::paint::Color;
use quill_engine::path::{FillRule, Path, PathBuilder};
use quill_engine::render::{PathIdBuffer, PathRenderer, RenderOptions};
use quill_engine::scene::{BuildOptions, Scene, SceneBuffers, ZIndex};
use quill_engine::text::{FontSystem, Typesetter};
use quill_engine::window::{Runtime, RuntimeConfig};

const WINDOW_WIDTH: f64 = 960.0;
const WINDOW_HEIGHT: f64 = 640.0;

/// Where the text block starts, in logical pixels.
const TEXT_ORIGIN: Vec2 = Vec2::new(40.0, 360.0);

/// Subpixel snapping for glyph origins.
const SUBPIXEL_GRANULARITY: f32 = 0.25;

#[derive(Parser, Debug)]
#[command(about = "Render a demo scene with the quill path renderer")]
struct Args {
    /// TrueType/OpenType font for the text block. Without it only shapes are drawn.
    #[arg(long)]
    font: Option<PathBuf>,
    /// Text to lay out.
    #[arg(
        long,
        default_value = "Every glyph here is a filled path: flattened once, stenciled, then covered."
    )]
    text: String,
    /// Point size of the text, in logical pixels per em.
    #[arg(long, default_value_t = 28.0)]
    size: f32,
    /// Wrap width of the text block, in logical pixels.
    #[arg(long, default_value_t = 880.0)]
    page_width: f32,
    /// Maximum flattening error, in physical pixels.
    #[arg(long, default_value_t = 0.25)]
    tolerance: f32,
    /// Rotate the whole scene around the window center.
    #[arg(long)]
    spin: bool,
    /// Draw opaque paths front to back.
    #[arg(long)]
    front_to_back: bool,
    /// Log filter (env_logger syntax); overrides RUST_LOG.
    #[arg(long)]
    log: Option<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(LoggingConfig {
        filter: args.log.clone(),
        ..LoggingConfig::default()
    });

    let scene = demo_scene(&args)?;
    log::info!("demo scene: {} fills", scene.len());

    let viewer = Viewer::new(scene, &args);
    let config = RuntimeConfig {
        title: "quill viewer".to_string(),
        initial_size: LogicalSize::new(WINDOW_WIDTH, WINDOW_HEIGHT),
    };
    Runtime::run(config, GpuInit::default(), viewer)
}

struct Viewer {
    scene: Scene,
    buffers: SceneBuffers,
    /// Scale factor the buffers were flattened for.
    built_for_scale: Option<f32>,
    tolerance: f32,

    renderer: PathRenderer,
    ids: PathIdBuffer,

    spin: bool,
    front_to_back: bool,
}

impl Viewer {
    fn new(scene: Scene, args: &Args) -> Self {
        Self {
            scene,
            buffers: SceneBuffers::default(),
            built_for_scale: None,
            tolerance: args.tolerance,
            renderer: PathRenderer::new(),
            ids: PathIdBuffer::new(),
            spin: args.spin,
            front_to_back: args.front_to_back,
        }
    }

    /// Rebuilds when the scale factor changes so flattening stays within
    /// `tolerance` physical pixels.
    fn ensure_built(&mut self, scale_factor: f32) -> Result<()> {
        if self.built_for_scale == Some(scale_factor) {
            return Ok(());
        }
        let options = BuildOptions {
            tolerance: self.tolerance / scale_factor.max(f32::EPSILON),
        };
        self.buffers = self.scene.build(&options).context("failed to build scene")?;
        self.built_for_scale = Some(scale_factor);

        let stats = self.buffers.stats;
        log::info!(
            "built {} paths ({} distinct meshes, {} vertices, {} skipped)",
            stats.paths,
            stats.unique_meshes,
            stats.vertices,
            stats.skipped
        );
        Ok(())
    }
}

impl App for Viewer {
    fn on_window_event(&mut self, _window: &WindowCtx<'_>, event: &WindowEvent) -> AppControl {
        match event {
            WindowEvent::KeyboardInput { event, .. }
                if event.state == ElementState::Pressed
                    && event.logical_key == Key::Named(NamedKey::Escape) =>
            {
                AppControl::Exit
            }
            _ => AppControl::Continue,
        }
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        let scale_factor = ctx.window.scale_factor();
        if let Err(e) = self.ensure_built(scale_factor) {
            log::error!("{e:#}");
            return AppControl::Exit;
        }

        let (w, h) = ctx.window.logical_size();
        let mut transform = Mat4::scale(scale_factor, scale_factor);
        if self.spin {
            let angle = ctx.time.elapsed * 0.5;
            transform = transform * Mat4::rotation_about(angle, Vec2::new(w * 0.5, h * 0.5));
        }
        let options = RenderOptions {
            transform,
            front_to_back_opaque: self.front_to_back,
        };

        let pick = ctx.pointer.pick;
        let (renderer, ids, buffers) = (&mut self.renderer, &mut self.ids, &self.buffers);

        let control = ctx.render(Color::from_srgb_u8(0x1e, 0x1f, 0x24, 0xff), |rctx, target| {
            renderer.render(rctx, target, buffers, &options);
            if pick.is_some() {
                renderer.render_ids(rctx, target.encoder, ids, buffers, &options);
            }
        });

        if let Some((x, y)) = pick {
            match ids.pick(ctx.gpu.device(), ctx.gpu.queue(), x, y) {
                Ok(Some(id)) => log::info!("({x}, {y}): path {}", id.get()),
                Ok(None) => log::info!("({x}, {y}): background"),
                Err(e) => log::warn!("pick failed: {e:#}"),
            }
        }

        control
    }
}

fn demo_scene(args: &Args) -> Result<Scene> {
    let mut scene = Scene::new();

    scene.push_path(
        ZIndex::BACKGROUND,
        Path::rect(Rect::new(20.0, 20.0, 920.0, 600.0)),
        Color::from_srgb_u8(0x2b, 0x2d, 0x35, 0xff),
    );

    // Overlapping translucent squares: later fills blend over earlier ones.
    let swatches = [
        (Rect::new(40.0, 40.0, 160.0, 160.0), Color::from_straight(0.9, 0.2, 0.2, 0.8)),
        (Rect::new(100.0, 100.0, 160.0, 160.0), Color::from_straight(0.2, 0.8, 0.3, 0.6)),
        (Rect::new(160.0, 60.0, 160.0, 160.0), Color::from_straight(0.2, 0.4, 0.95, 0.5)),
    ];
    for (rect, color) in swatches {
        scene.push_path(ZIndex::CONTENT, Path::rect(rect), color);
    }

    scene.push_path(
        ZIndex::CONTENT,
        Path::circle(Vec2::new(440.0, 150.0), 90.0),
        Color::from_srgb_u8(0xf2, 0xb1, 0x34, 0xff),
    );

    // Same self-intersecting star under both rules: even-odd leaves a hole.
    let star = Arc::new(star(Vec2::zero(), 90.0));
    let star_color = Color::from_srgb_u8(0x9b, 0x6c, 0xf0, 0xff);
    for (x, rule) in [(650.0, FillRule::NonZero), (850.0, FillRule::EvenOdd)] {
        scene.push_fill(
            ZIndex::CONTENT,
            Arc::clone(&star),
            star_color,
            StTransform::translation(x, 150.0),
            rule,
        );
    }

    // A row of rings clipped to a band.
    let ring = Arc::new(ring(28.0, 16.0));
    scene.push_clip(Rect::new(40.0, 280.0, 880.0, 40.0));
    for i in 0..14 {
        scene.push_fill(
            ZIndex::OVERLAY,
            Arc::clone(&ring),
            Color::from_straight(0.3, 0.85, 0.9, 0.9),
            StTransform::translation(70.0 + i as f32 * 62.0, 300.0),
            FillRule::NonZero,
        );
    }
    scene.pop_clip();

    if let Some(font_path) = &args.font {
        push_text(&mut scene, font_path, args)?;
    } else {
        log::info!("no --font given; skipping text");
    }

    Ok(scene)
}

fn push_text(scene: &mut Scene, font_path: &std::path::Path, args: &Args) -> Result<()> {
    let bytes = std::fs::read(font_path)
        .with_context(|| format!("failed to read font {}", font_path.display()))?;

    let mut fonts = FontSystem::new();
    let font_id = fonts.load_font(bytes).context("failed to load font")?;
    let font = fonts.font(font_id)?;

    let mut typesetter = Typesetter::new(args.page_width, font, args.size);
    typesetter.add_text(font, args.size, &args.text)?;
    let store = typesetter.create_glyph_store(&fonts, font_id)?;

    let page = Rect::new(0.0, 0.0, args.page_width, f32::MAX);
    let mut glyphs = typesetter.positioned_glyphs_in_rect(page, &store, args.size, 1.0, SUBPIXEL_GRANULARITY);
    for glyph in &mut glyphs {
        glyph.origin = glyph.origin + TEXT_ORIGIN;
    }

    log::info!(
        "text: {} glyphs placed, {} distinct outlines",
        glyphs.len(),
        store.len()
    );
    scene.push_glyphs(ZIndex::OVERLAY, &store, &glyphs, args.size, Color::from_srgb_u8(0xee, 0xee, 0xf0, 0xff));
    Ok(())
}

/// Five-pointed star drawn as one self-intersecting contour.
fn star(center: Vec2, radius: f32) -> Path {
    let points: Vec<Vec2> = (0..5)
        .map(|i| {
            let angle = -std::f32::consts::FRAC_PI_2 + i as f32 * 4.0 * std::f32::consts::PI / 5.0;
            center + Vec2::new(angle.cos(), angle.sin()) * radius
        })
        .collect();
    Path::polygon(&points)
}

/// Annulus around the origin: the inner circle winds the other way, so
/// non-zero filling leaves it empty.
fn ring(outer: f32, inner: f32) -> Path {
    const K: f32 = 0.552_284_75;
    let mut b = PathBuilder::new();

    let (r, k) = (outer, outer * K);
    b.move_to(r, 0.0);
    b.cubic_to(r, k, k, r, 0.0, r);
    b.cubic_to(-k, r, -r, k, -r, 0.0);
    b.cubic_to(-r, -k, -k, -r, 0.0, -r);
    b.cubic_to(k, -r, r, -k, r, 0.0);
    b.close();

    let (r, k) = (inner, inner * K);
    b.move_to(r, 0.0);
    b.cubic_to(r, -k, k, -r, 0.0, -r);
    b.cubic_to(-k, -r, -r, -k, -r, 0.0);
    b.cubic_to(-r, k, -k, r, 0.0, r);
    b.cubic_to(k, r, r, k, r, 0.0);
    b.close();

    b.build()
}
