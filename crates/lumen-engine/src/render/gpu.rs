use crate::paint::Color;

use super::{ClearPlanes, Graphics};

/// wgpu-backed graphics binding for one acquired frame.
///
/// Each `clear` records a render pass whose attachments use `LoadOp::Clear`
/// for the requested planes and `LoadOp::Load` for the others.
pub struct GpuGraphics<'a> {
    encoder: &'a mut wgpu::CommandEncoder,
    color_view: &'a wgpu::TextureView,
    depth_view: Option<&'a wgpu::TextureView>,
    clear_color: Color,
}

impl<'a> GpuGraphics<'a> {
    #[inline]
    pub fn new(
        encoder: &'a mut wgpu::CommandEncoder,
        color_view: &'a wgpu::TextureView,
        depth_view: Option<&'a wgpu::TextureView>,
    ) -> Self {
        Self {
            encoder,
            color_view,
            depth_view,
            clear_color: Color::BLACK,
        }
    }
}

impl Graphics for GpuGraphics<'_> {
    fn set_clear_color(&mut self, color: Color) {
        self.clear_color = color;
    }

    fn clear(&mut self, planes: ClearPlanes) {
        if planes.is_empty() {
            return;
        }

        let c = self.clear_color;
        let color_load = if planes.color {
            wgpu::LoadOp::Clear(wgpu::Color {
                r: c.r as f64,
                g: c.g as f64,
                b: c.b as f64,
                a: c.a as f64,
            })
        } else {
            wgpu::LoadOp::Load
        };

        let depth_stencil_attachment = self.depth_view.map(|view| wgpu::RenderPassDepthStencilAttachment {
            view,
            depth_ops: Some(wgpu::Operations {
                load: if planes.depth { wgpu::LoadOp::Clear(1.0) } else { wgpu::LoadOp::Load },
                store: wgpu::StoreOp::Store,
            }),
            stencil_ops: None,
        });

        if planes.depth && depth_stencil_attachment.is_none() {
            log::trace!("depth clear requested but the frame has no depth attachment");
        }

        // The pass only exists for its load ops; dropping it ends the pass.
        let _rpass = self.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("lumen clear"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view:           self.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load:  color_load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment,
            timestamp_writes:    None,
            occlusion_query_set: None,
            multiview_mask:      None,
        });
    }
}
