//! Shared GPU state descriptions used by the path renderer.

use crate::coords::{FramebufferSize, Mat4, Rect, Vec2};
use crate::path::FillRule;
use crate::vertex::PathUniformsGpu;

use super::depth::DEPTH_STENCIL_FORMAT;

// ── blend ─────────────────────────────────────────────────────────────────

pub(super) fn premul_alpha_blend() -> wgpu::BlendState {
    wgpu::BlendState {
        color: wgpu::BlendComponent {
            src_factor: wgpu::BlendFactor::One,
            dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
            operation: wgpu::BlendOperation::Add,
        },
        alpha: wgpu::BlendComponent {
            src_factor: wgpu::BlendFactor::One,
            dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
            operation: wgpu::BlendOperation::Add,
        },
    }
}

// ── depth / stencil ───────────────────────────────────────────────────────

fn face(compare: wgpu::CompareFunction, pass_op: wgpu::StencilOperation) -> wgpu::StencilFaceState {
    wgpu::StencilFaceState {
        compare,
        fail_op: wgpu::StencilOperation::Keep,
        depth_fail_op: wgpu::StencilOperation::Keep,
        pass_op,
    }
}

/// Stencil step: accumulates winding into the stencil buffer. Depth is
/// neither tested nor written.
pub(super) fn stencil_step_state(rule: FillRule) -> wgpu::DepthStencilState {
    let (front, back) = match rule {
        FillRule::NonZero => (
            face(wgpu::CompareFunction::Always, wgpu::StencilOperation::IncrementWrap),
            face(wgpu::CompareFunction::Always, wgpu::StencilOperation::DecrementWrap),
        ),
        FillRule::EvenOdd => {
            let f = face(wgpu::CompareFunction::Always, wgpu::StencilOperation::Invert);
            (f, f)
        }
    };

    wgpu::DepthStencilState {
        format: DEPTH_STENCIL_FORMAT,
        depth_write_enabled: false,
        depth_compare: wgpu::CompareFunction::Always,
        stencil: wgpu::StencilState {
            front,
            back,
            read_mask: 0xff,
            write_mask: 0xff,
        },
        bias: wgpu::DepthBiasState::default(),
    }
}

/// Cover step: shades pixels with a non-zero stencil and resets them to
/// zero, whether or not the depth test passes.
pub(super) fn cover_step_state() -> wgpu::DepthStencilState {
    let f = wgpu::StencilFaceState {
        compare: wgpu::CompareFunction::NotEqual,
        fail_op: wgpu::StencilOperation::Keep,
        depth_fail_op: wgpu::StencilOperation::Zero,
        pass_op: wgpu::StencilOperation::Zero,
    };

    wgpu::DepthStencilState {
        format: DEPTH_STENCIL_FORMAT,
        depth_write_enabled: true,
        depth_compare: wgpu::CompareFunction::LessEqual,
        stencil: wgpu::StencilState {
            front: f,
            back: f,
            read_mask: 0xff,
            write_mask: 0xff,
        },
        bias: wgpu::DepthBiasState::default(),
    }
}

// ── scissor rect ──────────────────────────────────────────────────────────

/// Converts a scene-space clip rect to scissor rect arguments for wgpu.
///
/// Clips live in the same space as path geometry, so the rect's corners go
/// through `transform` (the global uniform) and the scissor is their bounds,
/// rounded out to whole physical pixels.
///
/// Returns `None` if the result is zero-area (renderer should skip the draw call).
/// Returns `Some((x, y, w, h))` clamped to the framebuffer.
///
/// `clip = None` means "no scissor" → returns the full framebuffer rect.
pub(super) fn clip_to_scissor(
    clip: Option<Rect>,
    transform: &Mat4,
    framebuffer: FramebufferSize,
) -> Option<(u32, u32, u32, u32)> {
    let fw = framebuffer.width.max(1);
    let fh = framebuffer.height.max(1);

    let (x, y, w, h) = match clip {
        None => (0, 0, fw, fh),
        Some(r) => {
            let r = r.normalized();
            let (min, max) = (r.min(), r.max());
            let corners = [min, Vec2::new(max.x, min.y), max, Vec2::new(min.x, max.y)];
            let r = Rect::from_points(corners.into_iter().map(|p| transform.transform_point(p)))?;
            if !r.is_finite() {
                return None;
            }
            let x = (r.origin.x.floor().max(0.0) as u32).min(fw);
            let y = (r.origin.y.floor().max(0.0) as u32).min(fh);
            let x2 = ((r.origin.x + r.size.x).ceil().max(0.0) as u32).min(fw);
            let y2 = ((r.origin.y + r.size.y).ceil().max(0.0) as u32).min(fh);
            (x, y, x2.saturating_sub(x), y2.saturating_sub(y))
        }
    };

    if w == 0 || h == 0 { None } else { Some((x, y, w, h)) }
}

// ── uniform binding size ──────────────────────────────────────────────────

/// Returns the `wgpu` minimum binding size for the path uniform buffer.
pub(super) fn path_ubo_min_binding_size() -> std::num::NonZeroU64 {
    std::num::NonZeroU64::new(std::mem::size_of::<PathUniformsGpu>() as u64)
        .expect("PathUniformsGpu has non-zero size by construction")
}

#[cfg(test)]
mod tests {
    use super::*;

    const FB: FramebufferSize = FramebufferSize::new(100, 50);

    #[test]
    fn no_clip_is_full_framebuffer() {
        assert_eq!(clip_to_scissor(None, &Mat4::IDENTITY, FB), Some((0, 0, 100, 50)));
    }

    #[test]
    fn clip_is_rounded_out_and_clamped() {
        let s = clip_to_scissor(Some(Rect::new(-5.0, 10.5, 200.0, 10.0)), &Mat4::IDENTITY, FB);
        assert_eq!(s, Some((0, 10, 100, 11)));
    }

    #[test]
    fn clip_outside_framebuffer_skips() {
        let id = Mat4::IDENTITY;
        assert_eq!(clip_to_scissor(Some(Rect::new(120.0, 0.0, 10.0, 10.0)), &id, FB), None);
        assert_eq!(clip_to_scissor(Some(Rect::new(0.0, 0.0, 0.0, 10.0)), &id, FB), None);
    }

    #[test]
    fn clip_follows_hidpi_scale() {
        let fb = FramebufferSize::new(1920, 1280);
        let transform = Mat4::scale(2.0, 2.0);
        let (x, y, w, h) =
            clip_to_scissor(Some(Rect::new(40.0, 280.0, 880.0, 40.0)), &transform, fb).unwrap();
        assert_eq!((x, y, w, h), (80, 560, 1760, 80));

        // A shape centered inside the clip lands inside the scissor.
        let center = transform.transform_point(Vec2::new(70.0, 300.0));
        assert!(center.x >= x as f32 && center.x < (x + w) as f32);
        assert!(center.y >= y as f32 && center.y < (y + h) as f32);
    }

    #[test]
    fn rotated_clip_uses_corner_bounds() {
        let fb = FramebufferSize::new(200, 200);
        let transform = Mat4::rotation_about(std::f32::consts::FRAC_PI_2, Vec2::new(100.0, 100.0));
        let (x, y, w, h) = clip_to_scissor(Some(Rect::new(80.0, 0.0, 40.0, 20.0)), &transform, fb).unwrap();
        // The strip along the top edge turns into one along the right edge.
        // Rounding out may add a pixel.
        assert!((179..=180).contains(&x));
        assert_eq!(x + w, 200);
        assert!((79..=80).contains(&y));
        assert!((120..=121).contains(&(y + h)));
    }

    #[test]
    fn even_odd_inverts_both_faces() {
        let s = stencil_step_state(FillRule::EvenOdd);
        assert_eq!(s.stencil.front.pass_op, wgpu::StencilOperation::Invert);
        assert_eq!(s.stencil.back.pass_op, wgpu::StencilOperation::Invert);
        assert!(!s.depth_write_enabled);
    }

    #[test]
    fn non_zero_counts_by_facing() {
        let s = stencil_step_state(FillRule::NonZero);
        assert_eq!(s.stencil.front.pass_op, wgpu::StencilOperation::IncrementWrap);
        assert_eq!(s.stencil.back.pass_op, wgpu::StencilOperation::DecrementWrap);
    }

    #[test]
    fn cover_resets_stencil_on_depth_fail() {
        let s = cover_step_state();
        assert_eq!(s.stencil.front.compare, wgpu::CompareFunction::NotEqual);
        assert_eq!(s.stencil.front.depth_fail_op, wgpu::StencilOperation::Zero);
        assert_eq!(s.depth_compare, wgpu::CompareFunction::LessEqual);
    }
}
