// Copyright @yucwang 2026

//! Streaming reader for Mitsuba flavoured XML scene files.

use std::collections::HashMap;
use std::fs;
use std::path::{ Path, PathBuf };

use quick_xml::events::{ BytesStart, Event };
use quick_xml::Reader;

use crate::core::error::SceneLoadError;
use crate::core::light::Light;
use crate::core::material::Material;
use crate::core::mesh::Mesh;
use crate::core::scene::Scene;
use crate::core::texture::Texture2D;
use crate::emitters::directional::DirectionalLight;
use crate::emitters::point::PointLight;
use crate::io::obj_utils;
use crate::math::constants::{ Float, Matrix4f, Vector3f, PI };
use crate::math::spectrum::RGBSpectrum;
use crate::math::transform::Transform;
use crate::renderers::settings::RenderSettings;
use crate::sensors::perspective::PerspectiveCamera;
use crate::shapes::cube::Cube;
use crate::shapes::rectangle::Rectangle;
use crate::textures::image::load_texture;

type LoadResult<T> = std::result::Result<T, SceneLoadError>;

pub struct SceneLoadResult {
    pub scene: Scene,
    pub settings: RenderSettings,
}

pub fn load_scene<P: AsRef<Path>>(path: P) -> LoadResult<SceneLoadResult> {
    let path = path.as_ref();
    log::info!("Loading scene from: {}.", path.display());
    let xml = fs::read_to_string(path)?;
    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    parse_scene(&xml, base_dir)
}

/// Parses a scene document. Relative file names resolve against `base_dir`.
pub fn parse_scene(xml: &str, base_dir: &Path) -> LoadResult<SceneLoadResult> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);
    let mut buf = Vec::new();
    let mut loader = Loader::new(base_dir);

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Eof => break,
            Event::Start(e) => {
                let element = loader.start(&e)?;
                loader.stack.push(element);
            }
            Event::Empty(e) => {
                let element = loader.start(&e)?;
                loader.end(element)?;
            }
            Event::End(_) => {
                let element = loader.stack.pop().unwrap_or(Element::Other);
                loader.end(element)?;
            }
            _ => {}
        }
        buf.clear();
    }

    loader.finish()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Element {
    Integrator,
    Sampler,
    Sensor,
    Film,
    Transform,
    Bsdf,
    Texture,
    Shape,
    Emitter,
    Other,
}

struct Attributes(HashMap<String, String>);

impl Attributes {
    fn parse(e: &BytesStart, defaults: &HashMap<String, String>) -> LoadResult<Self> {
        let mut map = HashMap::new();
        for attr in e.attributes() {
            let attr = attr.map_err(quick_xml::Error::from)?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let value = attr.unescape_value()?;
            map.insert(key, resolve_value(&value, defaults));
        }
        Ok(Self(map))
    }

    fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(|s| s.as_str())
    }

    fn require(&self, key: &str, field: &'static str) -> LoadResult<&str> {
        self.get(key).ok_or(SceneLoadError::MissingField(field))
    }

    fn float_or(&self, key: &str, default: Float) -> LoadResult<Float> {
        self.get(key).map(parse_float).unwrap_or(Ok(default))
    }

    /// Either `value="x, y, z"` or separate `x`, `y`, `z` attributes.
    fn vector(&self, default: Float) -> LoadResult<Vector3f> {
        if let Some(value) = self.get("value") {
            return parse_vec3(value);
        }
        Ok(Vector3f::new(self.float_or("x", default)?,
                         self.float_or("y", default)?,
                         self.float_or("z", default)?))
    }
}

struct SensorBuilder {
    fov: Option<Float>,
    fov_axis: String,
    lookat: Option<(Vector3f, Vector3f, Vector3f)>,
    near_clip: Float,
    far_clip: Float,
}

struct BsdfBuilder {
    id: Option<String>,
    material: Material,
}

struct TextureBuilder {
    filename: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ShapeKind {
    Obj,
    Rectangle,
    Cube,
}

struct ShapeBuilder {
    kind: ShapeKind,
    filename: Option<String>,
    material: Option<u32>,
    radiance: Option<RGBSpectrum>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EmitterKind {
    Point,
    Directional,
    Area,
}

struct EmitterBuilder {
    kind: EmitterKind,
    position: Option<Vector3f>,
    direction: Option<Vector3f>,
    color: RGBSpectrum,
    intensity: Float,
    radius: Option<Float>,
    bulb_size: Float,
}

struct Loader {
    base_dir: PathBuf,
    defaults: HashMap<String, String>,
    stack: Vec<Element>,
    settings: RenderSettings,

    transform: Transform,
    sensor: Option<SensorBuilder>,
    bsdf: Option<BsdfBuilder>,
    texture: Option<TextureBuilder>,
    shape: Option<ShapeBuilder>,
    emitter: Option<EmitterBuilder>,

    camera: Option<PerspectiveCamera>,
    material_ids: HashMap<String, u32>,
    default_material: Option<u32>,
    materials: Vec<Material>,
    textures: Vec<Texture2D<RGBSpectrum>>,
    meshes: Vec<Mesh>,
    lights: Vec<Box<dyn Light>>,
}

impl Loader {
    fn new(base_dir: &Path) -> Self {
        Self {
            base_dir: base_dir.to_path_buf(),
            defaults: HashMap::new(),
            stack: Vec::new(),
            settings: RenderSettings::default(),
            transform: Transform::default(),
            sensor: None,
            bsdf: None,
            texture: None,
            shape: None,
            emitter: None,
            camera: None,
            material_ids: HashMap::new(),
            default_material: None,
            materials: Vec::new(),
            textures: Vec::new(),
            meshes: Vec::new(),
            lights: Vec::new(),
        }
    }

    fn parent(&self) -> Element {
        self.stack.last().copied().unwrap_or(Element::Other)
    }

    fn resolve_path(&self, filename: &str) -> PathBuf {
        let path = Path::new(filename);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }

    fn start(&mut self, e: &BytesStart) -> LoadResult<Element> {
        let attrs = Attributes::parse(e, &self.defaults)?;
        let element = match e.name().as_ref() {
            b"default" => {
                let name = attrs.require("name", "default.name")?.to_string();
                let value = attrs.require("value", "default.value")?.to_string();
                self.defaults.insert(name, value);
                Element::Other
            }
            b"integrator" => {
                let kind = attrs.require("type", "integrator.type")?;
                if kind != "path" {
                    return Err(SceneLoadError::Parse(format!("unsupported integrator: {}", kind)));
                }
                Element::Integrator
            }
            b"sampler" => Element::Sampler,
            b"sensor" => {
                let kind = attrs.require("type", "sensor.type")?;
                if kind != "perspective" {
                    return Err(SceneLoadError::Parse(format!("unsupported sensor: {}", kind)));
                }
                self.sensor = Some(SensorBuilder {
                    fov: None,
                    fov_axis: String::from("x"),
                    lookat: None,
                    near_clip: 1e-2,
                    far_clip: 1e4,
                });
                Element::Sensor
            }
            b"film" => Element::Film,
            b"transform" => {
                self.transform = Transform::default();
                Element::Transform
            }
            b"bsdf" => {
                let material = match attrs.require("type", "bsdf.type")? {
                    "diffuse" => Material::default(),
                    "principled" => Material::default().with_roughness(0.5),
                    kind => return Err(SceneLoadError::Parse(format!("unsupported bsdf: {}", kind))),
                };
                self.bsdf = Some(BsdfBuilder { id: attrs.get("id").map(String::from), material });
                Element::Bsdf
            }
            b"texture" => {
                if self.bsdf.is_none() {
                    return Err(SceneLoadError::Parse(String::from("texture outside of a bsdf")));
                }
                let kind = attrs.require("type", "texture.type")?;
                if kind != "bitmap" && kind != "image" {
                    return Err(SceneLoadError::Parse(format!("unsupported texture: {}", kind)));
                }
                self.texture = Some(TextureBuilder { filename: None });
                Element::Texture
            }
            b"shape" => {
                let kind = match attrs.require("type", "shape.type")? {
                    "obj" => ShapeKind::Obj,
                    "rectangle" => ShapeKind::Rectangle,
                    "cube" => ShapeKind::Cube,
                    kind => return Err(SceneLoadError::Parse(format!("unsupported shape: {}", kind))),
                };
                self.transform = Transform::default();
                self.shape = Some(ShapeBuilder { kind, filename: None, material: None, radiance: None });
                Element::Shape
            }
            b"emitter" => {
                let kind = match attrs.require("type", "emitter.type")? {
                    "point" => EmitterKind::Point,
                    "directional" => EmitterKind::Directional,
                    "area" => EmitterKind::Area,
                    kind => return Err(SceneLoadError::Parse(format!("unsupported emitter: {}", kind))),
                };
                if (kind == EmitterKind::Area) != (self.parent() == Element::Shape) {
                    return Err(SceneLoadError::Parse(String::from("area emitters must be nested in a shape")));
                }
                self.emitter = Some(EmitterBuilder {
                    kind,
                    position: None,
                    direction: None,
                    color: RGBSpectrum::splat(1.0),
                    intensity: 1.0,
                    radius: None,
                    bulb_size: 1.0,
                });
                Element::Emitter
            }
            b"ref" => {
                if let Some(shape) = self.shape.as_mut() {
                    let id = attrs.require("id", "ref.id")?;
                    let material = self.material_ids.get(id)
                        .ok_or_else(|| SceneLoadError::UnknownReference(id.to_string()))?;
                    shape.material = Some(*material);
                }
                Element::Other
            }
            b"lookat" => {
                if let Some(sensor) = self.sensor.as_mut() {
                    let origin = parse_vec3(attrs.require("origin", "lookat.origin")?)?;
                    let target = parse_vec3(attrs.require("target", "lookat.target")?)?;
                    let up = match attrs.get("up") {
                        Some(up) => parse_vec3(up)?,
                        None => Vector3f::y(),
                    };
                    sensor.lookat = Some((origin, target, up));
                }
                Element::Other
            }
            b"translate" => {
                self.transform = Transform::translate(&attrs.vector(0.0)?).compose(&self.transform);
                Element::Other
            }
            b"scale" => {
                let s = match attrs.get("value").map(|v| v.split(',').count()) {
                    Some(1) => Vector3f::repeat(attrs.float_or("value", 1.0)?),
                    _ => attrs.vector(1.0)?,
                };
                let scale = Transform::scale(&s)
                    .ok_or_else(|| SceneLoadError::Parse(format!("degenerate scale {:?}", s)))?;
                self.transform = scale.compose(&self.transform);
                Element::Other
            }
            b"matrix" => {
                let values = attrs.require("value", "matrix.value")?
                    .split(|c: char| c == ',' || c.is_whitespace())
                    .filter(|s| !s.is_empty())
                    .map(parse_float)
                    .collect::<LoadResult<Vec<Float>>>()?;
                if values.len() != 16 {
                    return Err(SceneLoadError::Parse(format!("matrix needs 16 values, got {}", values.len())));
                }
                let matrix = Transform::new(Matrix4f::from_row_slice(&values))
                    .ok_or_else(|| SceneLoadError::Parse(String::from("singular matrix")))?;
                self.transform = matrix.compose(&self.transform);
                Element::Other
            }
            b"float" | b"integer" | b"rgb" | b"string" | b"vector" | b"point" | b"boolean" => {
                self.parameter(e.name().as_ref(), &attrs)?;
                Element::Other
            }
            b"scene" => Element::Other,
            other => {
                log::debug!("Ignoring element <{}>.", String::from_utf8_lossy(other));
                Element::Other
            }
        };
        Ok(element)
    }

    fn parameter(&mut self, tag: &[u8], attrs: &Attributes) -> LoadResult<()> {
        let name = attrs.require("name", "parameter.name")?;
        let is_color = tag == b"rgb" || tag == b"float";

        match self.parent() {
            Element::Integrator => {
                let value = attrs.require("value", "integer.value")?;
                match name {
                    "max_depth" => {
                        let depth = parse_int(value)?;
                        if depth < 1 {
                            log::warn!("max_depth {} is not supported, keeping {} bounces.",
                                       depth, self.settings.bounces);
                        } else {
                            self.settings.bounces = depth as usize;
                        }
                    }
                    "tile_size" => self.settings.tile_size = parse_int(value)?.max(1) as usize,
                    "max_samples" => self.settings.max_samples = parse_int(value)?.max(1) as u32,
                    _ => {}
                }
            }
            Element::Sampler => {
                if name == "sample_count" {
                    self.settings.frames = parse_int(attrs.require("value", "integer.value")?)?.max(1) as u32;
                }
            }
            Element::Sensor => {
                if let Some(sensor) = self.sensor.as_mut() {
                    let value = attrs.require("value", "sensor.value")?;
                    match name {
                        "fov" => sensor.fov = Some(parse_float(value)?),
                        "fov_axis" => sensor.fov_axis = value.to_string(),
                        "near_clip" => sensor.near_clip = parse_float(value)?,
                        "far_clip" => sensor.far_clip = parse_float(value)?,
                        _ => {}
                    }
                }
            }
            Element::Film => {
                let value = attrs.require("value", "film.value")?;
                match name {
                    "width" => self.settings.width = parse_int(value)?.max(0) as usize,
                    "height" => self.settings.height = parse_int(value)?.max(0) as usize,
                    _ => {}
                }
            }
            Element::Bsdf => {
                if let Some(bsdf) = self.bsdf.as_mut() {
                    let value = attrs.require("value", "bsdf.value")?;
                    let material = &mut bsdf.material;
                    match name {
                        "base_color" | "reflectance" if is_color => material.albedo = parse_spectrum(value)?,
                        "roughness" => material.set_roughness(parse_float(value)?),
                        "metallic" => material.metalness = parse_float(value)?.clamp(0.0, 1.0),
                        "eta" | "ior" => material.ior = parse_float(value)?,
                        "specular" if tag == b"float" => {
                            material.specular = RGBSpectrum::splat(0.08 * parse_float(value)?)
                        }
                        "specular" => material.specular = parse_spectrum(value)?,
                        _ => log::debug!("Ignoring bsdf parameter {}.", name),
                    }
                }
            }
            Element::Texture => {
                if let Some(texture) = self.texture.as_mut() {
                    if name == "filename" {
                        texture.filename = Some(attrs.require("value", "texture.filename")?.to_string());
                    }
                }
            }
            Element::Shape => {
                if let Some(shape) = self.shape.as_mut() {
                    if name == "filename" {
                        shape.filename = Some(attrs.require("value", "shape.filename")?.to_string());
                    }
                }
            }
            Element::Emitter => {
                if let Some(emitter) = self.emitter.as_mut() {
                    match (emitter.kind, name) {
                        (_, "position") => emitter.position = Some(attrs.vector(0.0)?),
                        (_, "direction") => emitter.direction = Some(attrs.vector(0.0)?),
                        (_, "radius") => emitter.radius = Some(attrs.float_or("value", Float::MAX)?),
                        (_, "bulb_size") => emitter.bulb_size = attrs.float_or("value", 1.0)?,
                        (_, "intensity") | (_, "irradiance") if tag == b"float" => {
                            emitter.intensity = attrs.float_or("value", 1.0)?
                        }
                        (_, "intensity") | (_, "irradiance") | (_, "color") | (EmitterKind::Area, "radiance")
                            if is_color => {
                            emitter.color = parse_spectrum(attrs.require("value", "emitter.value")?)?
                        }
                        _ => log::debug!("Ignoring emitter parameter {}.", name),
                    }
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn end(&mut self, element: Element) -> LoadResult<()> {
        match element {
            Element::Sensor => self.finish_sensor()?,
            Element::Transform => {
                if self.parent() != Element::Shape && self.parent() != Element::Sensor {
                    log::debug!("Ignoring transform outside of a shape.");
                }
            }
            Element::Bsdf => self.finish_bsdf()?,
            Element::Texture => self.finish_texture()?,
            Element::Shape => self.finish_shape()?,
            Element::Emitter => self.finish_emitter()?,
            _ => {}
        }
        Ok(())
    }

    fn finish_sensor(&mut self) -> LoadResult<()> {
        let sensor = match self.sensor.take() {
            Some(sensor) => sensor,
            None => return Ok(()),
        };
        let (origin, target, up) = sensor.lookat.ok_or(SceneLoadError::MissingField("sensor.lookat"))?;
        let fov = sensor.fov.ok_or(SceneLoadError::MissingField("sensor.fov"))? * PI / 180.0;
        let (width, height) = (self.settings.width, self.settings.height);
        if width == 0 || height == 0 {
            return Err(SceneLoadError::Parse(format!("empty film {}x{}", width, height)));
        }

        let aspect = width as Float / height as Float;
        let fov_y = match sensor.fov_axis.as_str() {
            "y" => fov,
            "x" => 2.0 * ((0.5 * fov).tan() / aspect).atan(),
            axis => return Err(SceneLoadError::Parse(format!("unsupported fov_axis: {}", axis))),
        };
        self.camera = Some(PerspectiveCamera::new(origin, target, up, fov_y, width, height,
                                                  sensor.near_clip, sensor.far_clip));
        Ok(())
    }

    fn add_material(&mut self, material: Material) -> u32 {
        self.materials.push(material);
        (self.materials.len() - 1) as u32
    }

    fn finish_bsdf(&mut self) -> LoadResult<()> {
        let bsdf = match self.bsdf.take() {
            Some(bsdf) => bsdf,
            None => return Ok(()),
        };
        let index = self.add_material(bsdf.material);
        if let Some(id) = bsdf.id {
            self.material_ids.insert(id, index);
        }
        if let Some(shape) = self.shape.as_mut() {
            shape.material = Some(index);
        }
        Ok(())
    }

    fn finish_texture(&mut self) -> LoadResult<()> {
        let texture = match self.texture.take() {
            Some(texture) => texture,
            None => return Ok(()),
        };
        let filename = texture.filename.ok_or(SceneLoadError::MissingField("texture.filename"))?;
        let image = load_texture(&self.resolve_path(&filename))?;
        self.textures.push(image);
        if let Some(bsdf) = self.bsdf.as_mut() {
            bsdf.material.albedo = RGBSpectrum::splat(1.0);
            bsdf.material.albedo_texture = Some(self.textures.len() - 1);
        }
        Ok(())
    }

    fn finish_shape(&mut self) -> LoadResult<()> {
        let shape = match self.shape.take() {
            Some(shape) => shape,
            None => return Ok(()),
        };

        let material_id = match (shape.radiance, shape.material) {
            (Some(radiance), _) => self.add_material(Material::emitter(radiance)),
            (None, Some(id)) => id,
            (None, None) => match self.default_material {
                Some(id) => id,
                None => {
                    let id = self.add_material(Material::default());
                    self.default_material = Some(id);
                    id
                }
            },
        };

        let mesh = match shape.kind {
            ShapeKind::Obj => {
                let filename = shape.filename.ok_or(SceneLoadError::MissingField("shape.filename"))?;
                let mut mesh = obj_utils::load_mesh(self.resolve_path(&filename), material_id)?;
                mesh.transform(&self.transform);
                mesh
            }
            ShapeKind::Rectangle => Rectangle::new(self.transform).to_mesh(material_id),
            ShapeKind::Cube => Cube::new(self.transform).to_mesh(material_id),
        };
        if mesh.indices.is_empty() {
            log::warn!("Skipping empty {:?} shape.", shape.kind);
            return Ok(());
        }
        self.meshes.push(mesh);
        Ok(())
    }

    fn finish_emitter(&mut self) -> LoadResult<()> {
        let emitter = match self.emitter.take() {
            Some(emitter) => emitter,
            None => return Ok(()),
        };
        match emitter.kind {
            EmitterKind::Area => {
                if let Some(shape) = self.shape.as_mut() {
                    shape.radiance = Some(emitter.color * emitter.intensity);
                }
            }
            EmitterKind::Point => {
                let position = emitter.position.ok_or(SceneLoadError::MissingField("emitter.position"))?;
                let light = PointLight::new(position, emitter.color, emitter.intensity)
                    .with_range(emitter.radius.unwrap_or(Float::MAX), emitter.bulb_size);
                self.lights.push(Box::new(light));
            }
            EmitterKind::Directional => {
                let direction = emitter.direction.ok_or(SceneLoadError::MissingField("emitter.direction"))?;
                if direction.norm() == 0.0 {
                    return Err(SceneLoadError::Parse(String::from("zero emitter direction")));
                }
                self.lights.push(Box::new(DirectionalLight::new(direction, emitter.color, emitter.intensity)));
            }
        }
        Ok(())
    }

    fn finish(self) -> LoadResult<SceneLoadResult> {
        let camera = self.camera.ok_or(SceneLoadError::MissingField("sensor"))?;
        let mut scene = Scene::new(Box::new(camera));
        for material in self.materials {
            scene.add_material(material);
        }
        for texture in self.textures {
            scene.add_texture(texture);
        }
        for mesh in self.meshes {
            scene.add_mesh(mesh);
        }
        for light in self.lights {
            scene.add_light(light);
        }
        log::info!("Scene loaded: {} meshes, {} materials, {} lights.",
                   scene.meshes().len(), scene.materials().len(), scene.lights().len());
        Ok(SceneLoadResult { scene, settings: self.settings })
    }
}

fn resolve_value(raw: &str, defaults: &HashMap<String, String>) -> String {
    let mut out = raw.to_string();
    for (k, v) in defaults {
        out = out.replace(&format!("${}", k), v);
    }
    out
}

fn parse_float(value: &str) -> LoadResult<Float> {
    value.trim().parse::<Float>().map_err(|_| SceneLoadError::Parse(format!("invalid float: {}", value)))
}

fn parse_int(value: &str) -> LoadResult<i64> {
    value.trim().parse::<i64>().map_err(|_| SceneLoadError::Parse(format!("invalid integer: {}", value)))
}

fn parse_vec3(value: &str) -> LoadResult<Vector3f> {
    let parts = value.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .map(parse_float)
        .collect::<LoadResult<Vec<Float>>>()?;
    match parts.as_slice() {
        [x, y, z] => Ok(Vector3f::new(*x, *y, *z)),
        _ => Err(SceneLoadError::Parse(format!("invalid vec3: {}", value))),
    }
}

/// Accepts `"r, g, b"` or a single grey value.
fn parse_spectrum(value: &str) -> LoadResult<RGBSpectrum> {
    if !value.contains(',') && value.split_whitespace().count() == 1 {
        return Ok(RGBSpectrum::splat(parse_float(value)?));
    }
    let v = parse_vec3(value)?;
    Ok(RGBSpectrum::new(v.x, v.y, v.z))
}
