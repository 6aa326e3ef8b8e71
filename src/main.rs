use std::path::PathBuf;

use glam::Vec3;
use sdl2::{
    event::{Event, WindowEvent},
    keyboard::Keycode,
};

use threedimsim::{
    Error,
    abs::*,
    config::{Config, DEFAULT_CONFIG_PATH},
    logging, vert_data,
};

fn main() {
    if let Err(err) = run() {
        log::error!("{}", err);
        eprintln!("threedimsim: {}", err);
        std::process::exit(1);
    }
}

fn run() -> Result<(), Error> {
    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));
    let loaded = Config::load_if_present(&config_path)?;
    let found = loaded.is_some();
    let config = loaded.unwrap_or_default();
    logging::setup_logger(config.log.level_filter(), config.log.file.as_deref())?;
    if !found {
        log::warn!(
            "No configuration at {}, using defaults",
            config_path.display()
        );
    }

    let mut app = App::new(&config.window)?;

    let shader =
        ShaderProgram::from_files(&app.gl, &config.shaders.vertex, &config.shaders.fragment)?;

    // Textured rectangle, wired up by hand.
    let mut rectangle = Vao::new(&app.gl)?;
    let vbo = Vbo::with_data(
        &app.gl,
        &vert_data::RECTANGLE_TEXTURED_VERTS,
        BufferUsage::StaticDraw,
    )?;
    rectangle.add_vbo(vbo, &vert_data::textured_layout()?);
    rectangle.set_ebo(Ebo::with_indices(
        &app.gl,
        &vert_data::RECTANGLE_INDICES,
        BufferUsage::StaticDraw,
    )?);

    // A missing texture only costs us the texture.
    let params = TextureParam::repeat_linear_mipmap();
    let textures: Vec<Texture> = config
        .textures
        .iter()
        .filter_map(|entry| {
            Texture::from_file(
                &app.gl,
                glow::TEXTURE_2D,
                &params,
                &entry.path,
                entry.unit,
            )
            .inspect_err(|err| log::error!("Skipping texture: {}", err))
            .ok()
        })
        .collect();

    // Sampler uniforms only need to be set once.
    shader.use_program();
    for entry in &config.textures {
        shader.set_uniform(&entry.uniform, entry.unit as i32);
    }

    let (vertices, indices) = vert_data::triangle_mesh_data(Vec3::new(0.6, 0.6, 0.0), 0.5);
    let triangle = Mesh::new(&app.gl, vertices, indices, Vec::new())?;

    let [r, g, b, a] = config.clear_color;

    'running: loop {
        for event in app.event_pump.poll_iter() {
            match event {
                Event::Quit { .. }
                | Event::KeyDown {
                    keycode: Some(Keycode::Escape),
                    ..
                } => break 'running,
                Event::Window {
                    win_event: WindowEvent::Resized(width, height),
                    ..
                } => app.gl.viewport(0, 0, width, height),
                _ => {}
            }
        }

        app.gl.clear_color(r, g, b, a);
        app.gl.clear(glow::COLOR_BUFFER_BIT);

        shader.use_program();
        for texture in &textures {
            texture.bind();
        }

        rectangle.bind();
        app.gl.draw_elements(
            glow::TRIANGLES,
            vert_data::RECTANGLE_INDICES.len() as i32,
            glow::UNSIGNED_INT,
            0,
        );
        rectangle.unbind();

        triangle.draw(&shader);

        app.window.gl_swap_window();
    }

    log::info!("Shutting down");
    Ok(())
}
