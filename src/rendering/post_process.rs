//! Full-screen stage filter: film grain, vignette and the stage distortion.
//!
//! The distortion (chromatic split, colour drain and screen wobble) scales
//! with the stage's shader intensity, so late stages look increasingly wrong.
//! Runs as one fullscreen pass after tonemapping.

use bevy::{
    asset::load_internal_asset,
    core_pipeline::{
        core_3d::graph::{Core3d, Node3d},
        fullscreen_vertex_shader::fullscreen_shader_vertex_state,
    },
    ecs::query::QueryItem,
    prelude::*,
    render::{
        extract_component::{
            ComponentUniforms, DynamicUniformIndex, ExtractComponent, ExtractComponentPlugin,
            UniformComponentPlugin,
        },
        render_graph::{
            NodeRunError, RenderGraphApp, RenderGraphContext, RenderLabel, ViewNode, ViewNodeRunner,
        },
        render_resource::{
            binding_types::{sampler, texture_2d, uniform_buffer},
            BindGroup, BindGroupEntries, BindGroupLayout, BindingResource, BindGroupLayoutEntries, CachedRenderPipelineId,
            ColorTargetState, ColorWrites, FragmentState, MultisampleState, Operations,
            PipelineCache, PrimitiveState, RenderPassColorAttachment, RenderPassDescriptor,
            RenderPipelineDescriptor, Sampler, SamplerBindingType, SamplerDescriptor, ShaderStages,
            ShaderType, TextureFormat, TextureSampleType, TextureView,
        },
        renderer::{RenderContext, RenderDevice},
        view::ViewTarget,
        RenderApp,
    },
};

use super::visual_config::VisualConfig;

const STAGE_FILTER_SHADER: Handle<Shader> =
    Handle::weak_from_u128(0x5f1c_9a7e_3d2b_4c8a_91e6_0b7d_2a4f_6c3e);

/// Adds the stage filter pass to every camera carrying [`PostProcessSettings`].
pub struct StagePostProcessPlugin;

impl Plugin for StagePostProcessPlugin {
    fn build(&self, app: &mut App) {
        load_internal_asset!(
            app,
            STAGE_FILTER_SHADER,
            "../../assets/shaders/post_process.wgsl",
            Shader::from_wgsl
        );

        app.add_plugins((
            ExtractComponentPlugin::<PostProcessSettings>::default(),
            UniformComponentPlugin::<PostProcessSettings>::default(),
        ));

        app.add_systems(Update, advance_filter_clock);

        let Some(render_app) = app.get_sub_app_mut(RenderApp) else {
            return;
        };

        render_app
            .add_render_graph_node::<ViewNodeRunner<StageFilterNode>>(Core3d, StageFilterLabel)
            .add_render_graph_edges(
                Core3d,
                (Node3d::Tonemapping, StageFilterLabel, Node3d::EndMainPassPostProcessing),
            );
    }

    fn finish(&self, app: &mut App) {
        let Some(render_app) = app.get_sub_app_mut(RenderApp) else {
            return;
        };

        render_app.init_resource::<StageFilterPipeline>();
    }
}

#[derive(Debug, Hash, PartialEq, Eq, Clone, RenderLabel)]
struct StageFilterLabel;

/// Uniforms for the stage filter. Field order matches the WGSL struct.
#[derive(Component, Clone, Copy, ExtractComponent, ShaderType)]
pub struct PostProcessSettings {
    pub grain_intensity: f32,
    pub grain_speed: f32,
    pub grain_coarseness: f32,
    pub vignette_intensity: f32,
    /// Distance from the centre where darkening starts
    pub vignette_radius: f32,
    /// Stage distortion, 0.0 up to 1.5
    pub distortion: f32,
    /// Red/blue channel split in UV units at distortion 1.0
    pub aberration: f32,
    /// Seconds since startup, drives grain and wobble
    pub time: f32,
}

impl Default for PostProcessSettings {
    fn default() -> Self {
        Self::from_config(&VisualConfig::default())
    }
}

impl PostProcessSettings {
    pub fn from_config(config: &VisualConfig) -> Self {
        Self {
            grain_intensity: config.grain_intensity,
            grain_speed: config.grain_speed,
            grain_coarseness: config.grain_coarseness,
            vignette_intensity: config.vignette_intensity,
            vignette_radius: config.vignette_radius,
            distortion: 0.0,
            aberration: 0.004,
            time: 0.0,
        }
    }
}

fn advance_filter_clock(time: Res<Time>, mut query: Query<&mut PostProcessSettings>) {
    for mut settings in &mut query {
        settings.time = time.elapsed_secs();
    }
}

#[derive(Default)]
struct StageFilterNode;

impl ViewNode for StageFilterNode {
    type ViewQuery = (&'static ViewTarget, &'static DynamicUniformIndex<PostProcessSettings>);

    fn run(
        &self,
        _graph: &mut RenderGraphContext,
        render_context: &mut RenderContext,
        (view_target, settings_index): QueryItem<Self::ViewQuery>,
        world: &World,
    ) -> Result<(), NodeRunError> {
        let filter = world.resource::<StageFilterPipeline>();
        let Some(pipeline) = world
            .resource::<PipelineCache>()
            .get_render_pipeline(filter.pipeline_id)
        else {
            // Shader still compiling
            return Ok(());
        };
        let Some(uniforms) = world
            .resource::<ComponentUniforms<PostProcessSettings>>()
            .uniforms()
            .binding()
        else {
            return Ok(());
        };

        let target = view_target.post_process_write();
        let bind_group = filter.bind_group(render_context.render_device(), target.source, uniforms);

        let mut pass = render_context.begin_tracked_render_pass(RenderPassDescriptor {
            label: Some("stage_filter_pass"),
            color_attachments: &[Some(RenderPassColorAttachment {
                view: target.destination,
                resolve_target: None,
                ops: Operations::default(),
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });
        pass.set_render_pipeline(pipeline);
        pass.set_bind_group(0, &bind_group, &[settings_index.index()]);
        pass.draw(0..3, 0..1);

        Ok(())
    }
}

#[derive(Resource)]
struct StageFilterPipeline {
    layout: BindGroupLayout,
    sampler: Sampler,
    pipeline_id: CachedRenderPipelineId,
}

impl StageFilterPipeline {
    fn bind_group(&self, device: &RenderDevice, source: &TextureView, uniforms: BindingResource) -> BindGroup {
        device.create_bind_group(
            "stage_filter_bind_group",
            &self.layout,
            &BindGroupEntries::sequential((source, &self.sampler, uniforms)),
        )
    }
}

impl FromWorld for StageFilterPipeline {
    fn from_world(world: &mut World) -> Self {
        let render_device = world.resource::<RenderDevice>();

        let layout = render_device.create_bind_group_layout(
            "stage_filter_bind_group_layout",
            &BindGroupLayoutEntries::sequential(
                ShaderStages::FRAGMENT,
                (
                    texture_2d(TextureSampleType::Float { filterable: true }),
                    sampler(SamplerBindingType::Filtering),
                    uniform_buffer::<PostProcessSettings>(true),
                ),
            ),
        );

        let sampler = render_device.create_sampler(&SamplerDescriptor::default());

        let pipeline_id =
            world
                .resource_mut::<PipelineCache>()
                .queue_render_pipeline(RenderPipelineDescriptor {
                    label: Some("stage_filter_pipeline".into()),
                    layout: vec![layout.clone()],
                    vertex: fullscreen_shader_vertex_state(),
                    fragment: Some(FragmentState {
                        shader: STAGE_FILTER_SHADER,
                        shader_defs: vec![],
                        entry_point: "fragment".into(),
                        targets: vec![Some(ColorTargetState {
                            format: TextureFormat::Rgba8UnormSrgb,
                            blend: None,
                            write_mask: ColorWrites::ALL,
                        })],
                    }),
                    primitive: PrimitiveState::default(),
                    depth_stencil: None,
                    multisample: MultisampleState::default(),
                    push_constant_ranges: vec![],
                    zero_initialize_workgroup_memory: false,
                });

        Self {
            layout,
            sampler,
            pipeline_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_start_undistorted() {
        let config = VisualConfig {
            grain_intensity: 0.1,
            vignette_radius: 0.4,
            ..default()
        };
        let settings = PostProcessSettings::from_config(&config);
        assert_eq!(settings.grain_intensity, 0.1);
        assert_eq!(settings.vignette_radius, 0.4);
        assert_eq!(settings.distortion, 0.0);
    }
}
