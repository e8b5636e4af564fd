use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand, ValueEnum};
use gammapipe::{
    Argb32, Composite, CompositeConfig, DestinationSurface, FillJob, GammaLut, GammaResult,
    LinearGradient, Paint, ParallelOpts, PixelLayout, Surface, TexturePaint, TileContext, TileRect,
    argb, run_parallel,
};
use kurbo::{Circle, Point, Shape};

#[derive(Parser, Debug)]
#[command(name = "gammapipe", version)]
struct Cli {
    #[command(flatten)]
    gamma: GammaArgs,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render anti-aliased discs over a striped background as a PNG.
    Discs(DiscArgs),
    /// Composite one PNG over another.
    Over(OverArgs),
}

#[derive(Args, Debug)]
struct GammaArgs {
    /// Composite config JSON (`{"gamma": 2.2, "gamma_correction": true}`).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override the display gamma.
    #[arg(long, global = true)]
    gamma: Option<f64>,

    /// Blend on display values instead of linear light.
    #[arg(long, global = true, default_value_t = false)]
    linear: bool,
}

#[derive(Parser, Debug)]
struct DiscArgs {
    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Image width and height in pixels.
    #[arg(long, default_value_t = 256)]
    size: u32,

    /// Tile edge in pixels.
    #[arg(long, default_value_t = 32)]
    tile: u32,

    /// Extra alpha applied to every disc.
    #[arg(long, default_value_t = 1.0)]
    alpha: f32,

    /// Destination surface layout.
    #[arg(long, value_enum, default_value_t = LayoutArg::Argb)]
    layout: LayoutArg,

    /// Render horizontal bands on this many worker threads.
    #[arg(long)]
    threads: Option<usize>,
}

#[derive(Parser, Debug)]
struct OverArgs {
    /// Foreground PNG.
    #[arg(long)]
    top: PathBuf,

    /// Background PNG; the output has its size.
    #[arg(long)]
    bottom: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Extra alpha applied to the foreground.
    #[arg(long, default_value_t = 1.0)]
    alpha: f32,

    /// Tile edge in pixels.
    #[arg(long, default_value_t = 64)]
    tile: u32,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum LayoutArg {
    Argb,
    ArgbPre,
    Abgr,
    AbgrPre,
}

impl From<LayoutArg> for PixelLayout {
    fn from(l: LayoutArg) -> Self {
        match l {
            LayoutArg::Argb => PixelLayout::IntArgb,
            LayoutArg::ArgbPre => PixelLayout::IntArgbPre,
            LayoutArg::Abgr => PixelLayout::FourByteAbgr,
            LayoutArg::AbgrPre => PixelLayout::FourByteAbgrPre,
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let lut = load_lut(&cli.gamma)?;
    match cli.cmd {
        Command::Discs(args) => cmd_discs(args, lut),
        Command::Over(args) => cmd_over(args, lut),
    }
}

fn load_lut(args: &GammaArgs) -> anyhow::Result<Arc<GammaLut>> {
    let mut cfg = match &args.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("read config '{}'", path.display()))?;
            CompositeConfig::from_json_str(&text)?
        }
        None => CompositeConfig::from_env(),
    };
    if let Some(g) = args.gamma {
        cfg.gamma = g;
    }
    if args.linear {
        cfg.gamma_correction = false;
    }
    Ok(cfg.lut()?)
}

struct Disc {
    circle: Circle,
    color: Argb32,
    /// Second color for a vertical gradient fill.
    fade_to: Option<Argb32>,
}

fn scene(size: u32) -> Vec<Disc> {
    let s = f64::from(size);
    vec![
        Disc {
            circle: Circle::new((s * 0.35, s * 0.4), s * 0.3),
            color: argb(0xFF, 0xFF, 0x20, 0x20),
            fade_to: None,
        },
        Disc {
            circle: Circle::new((s * 0.65, s * 0.4), s * 0.3),
            color: argb(0x80, 0x20, 0xFF, 0x20),
            fade_to: None,
        },
        Disc {
            circle: Circle::new((s * 0.5, s * 0.68), s * 0.28),
            color: argb(0xFF, 0x20, 0x40, 0xFF),
            fade_to: Some(argb(0x00, 0x20, 0x40, 0xFF)),
        },
    ]
}

/// One horizontal band of the output, rendered independently.
struct Band<'a> {
    y0: u32,
    surface: Surface,
    discs: &'a [Disc],
    tile: u32,
    composite: Composite,
}

impl FillJob for Band<'_> {
    fn fill(&mut self, ctx: &mut TileContext) -> GammaResult<()> {
        for disc in self.discs {
            fill_disc(ctx, &mut self.surface, self.y0, disc, self.tile, self.composite)?;
        }
        Ok(())
    }
}

fn cmd_discs(args: DiscArgs, lut: Arc<GammaLut>) -> anyhow::Result<()> {
    anyhow::ensure!(args.size > 0, "--size must be > 0");
    let composite = Composite::src_over().with_alpha(args.alpha)?;
    let discs = scene(args.size);
    let layout = PixelLayout::from(args.layout);

    let bands_wanted = u32::try_from(args.threads.unwrap_or(1).max(1))
        .map_err(|_| anyhow::anyhow!("--threads must be <= {}", u32::MAX))?;
    let band_h = args.size.div_ceil(bands_wanted).max(1);
    let mut bands = Vec::new();
    let mut y0 = 0;
    while y0 < args.size {
        let h = band_h.min(args.size - y0);
        bands.push(Band {
            y0,
            surface: striped(args.size, h, y0, layout)?,
            discs: &discs,
            tile: args.tile,
            composite,
        });
        y0 += h;
    }

    if args.threads.is_some() {
        let opts = ParallelOpts {
            threads: args.threads,
        };
        run_parallel(&mut bands, &opts, lut)?;
    } else {
        let mut ctx = TileContext::with_lut(lut);
        for band in &mut bands {
            band.fill(&mut ctx)?;
        }
    }

    let mut out = image::RgbaImage::new(args.size, args.size);
    for band in &bands {
        let img = band.surface.to_rgba_image()?;
        image::imageops::replace(&mut out, &img, 0, i64::from(band.y0));
    }
    out.save(&args.out)
        .with_context(|| format!("write '{}'", args.out.display()))?;
    tracing::info!(out = %args.out.display(), bands = bands.len(), "discs written");
    Ok(())
}

fn cmd_over(args: OverArgs, lut: Arc<GammaLut>) -> anyhow::Result<()> {
    let top = image::open(&args.top)
        .with_context(|| format!("read '{}'", args.top.display()))?
        .to_rgba8();
    let bottom = image::open(&args.bottom)
        .with_context(|| format!("read '{}'", args.bottom.display()))?
        .to_rgba8();

    let mut surface = Surface::from_rgba_image(&bottom, PixelLayout::IntArgb)?;
    let texture: Vec<Argb32> = top
        .pixels()
        .map(|p| {
            let [r, g, b, a] = p.0;
            argb(a, r, g, b)
        })
        .collect();
    let paint = Paint::source(TexturePaint::new(texture, top.width(), top.height())?);
    let bounds = TileRect::new(
        0,
        0,
        top.width().min(bottom.width()),
        top.height().min(bottom.height()),
    );

    let mut ctx = TileContext::with_lut(lut);
    let composite = Composite::src_over().with_alpha(args.alpha)?;
    let mut seq = ctx.start_sequence(&mut surface, bounds, paint, composite)?;
    for rect in seq.bounds().tiles(args.tile)? {
        seq.render_tile(None, 0, rect.w as usize, rect)?;
    }
    let stats = seq.end();
    tracing::info!(tiles = stats.tiles_rendered, "over composited");

    surface
        .to_rgba_image()?
        .save(&args.out)
        .with_context(|| format!("write '{}'", args.out.display()))?;
    Ok(())
}

/// Opaque grey stripes, eight pixels wide, for the band starting at `y0`.
fn striped(width: u32, height: u32, y0: u32, layout: PixelLayout) -> GammaResult<Surface> {
    let mut s = Surface::new(width, height, layout)?;
    for y in 0..height {
        for x in 0..width {
            let v = if ((x + y + y0) / 8) % 2 == 0 { 0xE0 } else { 0x30 };
            s.set_pixel(x, y, argb(0xFF, v, v, v));
        }
    }
    Ok(s)
}

fn fill_disc(
    ctx: &mut TileContext,
    surface: &mut Surface,
    y0: u32,
    disc: &Disc,
    tile: u32,
    composite: Composite,
) -> GammaResult<()> {
    let band = TileRect::new(0, 0, surface.width(), surface.height());
    let bbox = disc.circle.bounding_box();
    let shifted = kurbo::Rect::new(
        bbox.x0,
        bbox.y0 - f64::from(y0),
        bbox.x1,
        bbox.y1 - f64::from(y0),
    );
    let bounds = TileRect::covering(shifted).intersect(band);
    if bounds.is_empty() {
        return Ok(());
    }

    let paint = match disc.fade_to {
        None => Paint::Solid(disc.color),
        Some(to) => {
            let c = disc.circle.center;
            let r = disc.circle.radius;
            let top = Point::new(c.x, c.y - r - f64::from(y0));
            let bottom = Point::new(c.x, c.y + r - f64::from(y0));
            Paint::source(LinearGradient::new(top, bottom, disc.color, to)?)
        }
    };

    let mut coverage = Vec::new();
    let mut seq = ctx.start_sequence(surface, bounds, paint, composite)?;
    for rect in seq.bounds().tiles(tile)? {
        if !seq.need_tile(rect) {
            continue;
        }
        if disc_coverage(&disc.circle, y0, rect, &mut coverage) {
            seq.render_tile(Some(&coverage), 0, rect.w as usize, rect)?;
        } else {
            seq.skip_tile(rect);
        }
    }
    seq.end();
    Ok(())
}

/// 4x4 supersampled coverage of `circle` over `rect`; `false` when nothing is covered.
fn disc_coverage(circle: &Circle, y0: u32, rect: TileRect, out: &mut Vec<u8>) -> bool {
    const SS: u32 = 4;
    out.clear();
    out.resize(rect.area(), 0);
    let mut any = false;
    for j in 0..rect.h {
        for i in 0..rect.w {
            let mut hits = 0u32;
            for sy in 0..SS {
                for sx in 0..SS {
                    let p = Point::new(
                        f64::from(rect.x + i) + (f64::from(sx) + 0.5) / f64::from(SS),
                        f64::from(rect.y + j + y0) + (f64::from(sy) + 0.5) / f64::from(SS),
                    );
                    if circle.contains(p) {
                        hits += 1;
                    }
                }
            }
            let m = (hits * 255 / (SS * SS)) as u8;
            any |= m != 0;
            out[(j * rect.w + i) as usize] = m;
        }
    }
    any
}
