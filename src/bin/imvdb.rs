use imvdb::{
    array_from_grid, fog_to_sdf, from_dense, normalized, volume_to_mesh, write, write_stl, DType, Grid, GridClass,
    HostArray,
};

use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

const USAGE: &str = "usage: imvdb demo WORKSPACE [ISO_VALUE THRESHOLD_MIN THRESHOLD_MAX [RAW_F32_FILE NX NY NZ]]";

const DEFAULT_ISO_VALUE: f32 = 1500.0;
const DEFAULT_THRESHOLD_MIN: f32 = 1000.0;
const DEFAULT_THRESHOLD_MAX: f32 = 3000.0;
const PHANTOM_EDGE: usize = 64;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().collect();
    match args.get(1).map(String::as_str) {
        Some("demo") if args.len() >= 3 => demo(&DemoArgs::parse(&args[2..])?),
        _ => {
            eprintln!("{}", USAGE);
            std::process::exit(2);
        }
    }
}

struct DemoArgs {
    workspace: PathBuf,
    iso_value: f32,
    threshold_min: f32,
    threshold_max: f32,
    input: Option<(PathBuf, [usize; 3])>,
}

impl DemoArgs {
    /// `args` are the arguments after `demo`: the workspace, then optionally the 3 threshold values, then optionally the 4
    /// input image values. Partial groups are rejected.
    fn parse(args: &[String]) -> Result<Self, Box<dyn Error>> {
        if ![1, 4, 8].contains(&args.len()) {
            return Err(format!("{}\nexpected 1, 4 or 8 arguments after demo, found {}", USAGE, args.len()).into());
        }

        let mut parsed = Self {
            workspace: PathBuf::from(&args[0]),
            iso_value: DEFAULT_ISO_VALUE,
            threshold_min: DEFAULT_THRESHOLD_MIN,
            threshold_max: DEFAULT_THRESHOLD_MAX,
            input: None,
        };
        if args.len() >= 4 {
            parsed.iso_value = args[1].parse()?;
            parsed.threshold_min = args[2].parse()?;
            parsed.threshold_max = args[3].parse()?;
        }
        if args.len() >= 8 {
            let shape = [args[5].parse()?, args[6].parse()?, args[7].parse()?];
            parsed.input = Some((PathBuf::from(&args[4]), shape));
        }
        if parsed.threshold_max <= parsed.threshold_min {
            return Err(format!("{}\nTHRESHOLD_MAX must exceed THRESHOLD_MIN", USAGE).into());
        }

        Ok(parsed)
    }
}

/// Builds a fog volume from a thresholded image, converts it to a level set, and saves archives, raw arrays and STL meshes of
/// both into the workspace.
fn demo(args: &DemoArgs) -> Result<(), Box<dyn Error>> {
    fs::create_dir_all(&args.workspace)?;

    let (raw, shape) = match &args.input {
        Some((path, shape)) => {
            tracing::info!("Reading {:?} image from {}", shape, path.display());
            (fs::read(path)?, *shape)
        }
        None => {
            tracing::info!("No input image; using a {}^3 radial phantom", PHANTOM_EDGE);
            (phantom_bytes(PHANTOM_EDGE), [PHANTOM_EDGE; 3])
        }
    };
    let image = HostArray::from_bytes(&raw, DType::Float32, &shape);

    let range = args.threshold_max - args.threshold_min;
    let iso_value = (args.iso_value - args.threshold_min) / range;
    let fog_values = normalized(&image, (args.threshold_min, args.threshold_max))?;

    let mut fog_volume = from_dense(&fog_values, [0.0; 3], [1.0; 3], 0.0, 0.0);
    fog_volume.set_grid_class(GridClass::FogVolume);
    save(&mut fog_volume, "fog_volume", iso_value, &args.workspace)?;

    let mut level_set = fog_to_sdf(&fog_volume, iso_value);
    save(&mut level_set, "level_set", 0.0, &args.workspace)?;

    Ok(())
}

fn save(grid: &mut Grid, name: &str, iso_value: f32, workspace: &Path) -> Result<(), Box<dyn Error>> {
    grid.set_name(name);
    grid.set_creator("imvdb");
    println!("{}", grid);

    let archive_path = workspace.join(format!("{}.vdb", name));
    write(&[&*grid], &archive_path)?;

    let (array, _origin, _spacing) = array_from_grid(grid)?;
    let raw_path = workspace.join(format!("{}.raw", name));
    fs::write(&raw_path, bytemuck::cast_slice::<f32, u8>(array.values_slice()))?;

    let mesh = volume_to_mesh(grid, iso_value, 0.0);
    let mesh_path = workspace.join(format!("{}.stl", name));
    write_stl(&mesh, &mesh_path)?;

    tracing::info!(
        "Saved {}, {} and {} ({} faces)",
        archive_path.display(),
        raw_path.display(),
        mesh_path.display(),
        mesh.num_faces()
    );

    Ok(())
}

/// Density falling off linearly from 4000 at the center to 0 at the faces of the cube.
fn phantom_bytes(edge: usize) -> Vec<u8> {
    let center = edge as f32 / 2.0;
    let mut values = Vec::with_capacity(edge * edge * edge);
    for x in 0..edge {
        for y in 0..edge {
            for z in 0..edge {
                let d = [x, y, z].iter().map(|c| (*c as f32 - center).powi(2)).sum::<f32>().sqrt();
                values.push(4000.0 * (1.0 - d / center).max(0.0));
            }
        }
    }

    bytemuck::cast_slice(&values).to_vec()
}

// ████████╗███████╗███████╗████████╗
// ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝
//    ██║   █████╗  ███████╗   ██║
//    ██║   ██╔══╝  ╚════██║   ██║
//    ██║   ███████╗███████║   ██║
//    ╚═╝   ╚══════╝╚══════╝   ╚═╝
