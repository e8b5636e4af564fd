use std::sync::atomic::{AtomicUsize, Ordering};

use super::*;
use crate::blend::mode::Composite;
use crate::foundation::core::{PixelLayout, TileRect};
use crate::paint::Paint;
use crate::raster::surface::Surface;

const SIZE: u32 = 16;

fn layer(ctx: &mut TileContext, surface: &mut Surface, seed: u32) -> GammaResult<()> {
    let bounds = TileRect::new(0, 0, SIZE, SIZE);
    for (i, color) in [0x80FF_0000u32, 0xC000_FF00, 0x6000_00FF].into_iter().enumerate() {
        let mut seq =
            ctx.start_sequence(&mut *surface, bounds, Paint::Solid(color), Composite::src_over())?;
        for rect in bounds.tiles(5)? {
            let coverage: Vec<u8> = (0..rect.area())
                .map(|k| ((k as u32 * 37 + seed * 11 + i as u32 * 101) % 256) as u8)
                .collect();
            seq.render_tile(Some(&coverage), 0, rect.w as usize, rect)?;
        }
        seq.end();
    }
    Ok(())
}

fn surfaces() -> Vec<Surface> {
    (0..6)
        .map(|_| Surface::new(SIZE, SIZE, PixelLayout::IntArgb).unwrap())
        .collect()
}

#[test]
fn parallel_jobs_match_sequential_result() {
    let lut = Arc::new(GammaLut::new(2.2));

    let mut expected = surfaces();
    let mut ctx = TileContext::with_lut(Arc::clone(&lut));
    for (seed, s) in expected.iter_mut().enumerate() {
        layer(&mut ctx, s, seed as u32).unwrap();
    }

    let mut actual = surfaces();
    {
        let mut jobs: Vec<_> = actual
            .iter_mut()
            .enumerate()
            .map(|(seed, s)| move |ctx: &mut TileContext| layer(ctx, s, seed as u32))
            .collect();
        run_parallel(&mut jobs, &ParallelOpts { threads: Some(3) }, lut).unwrap();
    }
    assert_eq!(actual, expected);
}

#[test]
fn first_job_error_is_reported() {
    let lut = Arc::new(GammaLut::identity());
    let mut jobs: Vec<Box<dyn FnMut(&mut TileContext) -> GammaResult<()> + Send>> = vec![
        Box::new(|_: &mut TileContext| Ok(())),
        Box::new(|_: &mut TileContext| Err(GammaError::validation("band 1"))),
        Box::new(|_: &mut TileContext| Err(GammaError::validation("band 2"))),
    ];
    let err = run_parallel(&mut jobs, &ParallelOpts { threads: Some(2) }, lut).unwrap_err();
    assert!(matches!(err, GammaError::Validation(m) if m == "band 1"));
}

#[test]
fn zero_threads_is_rejected() {
    let mut jobs: Vec<fn(&mut TileContext) -> GammaResult<()>> = vec![|_| Ok(())];
    let err = run_parallel(
        &mut jobs,
        &ParallelOpts { threads: Some(0) },
        Arc::new(GammaLut::identity()),
    )
    .unwrap_err();
    assert!(matches!(err, GammaError::Validation(_)));
}

#[test]
fn runner_reuses_one_context_per_worker_across_calls() {
    let runner = ParallelRunner::new(
        &ParallelOpts { threads: Some(2) },
        Arc::new(GammaLut::new(2.2)),
    )
    .unwrap();
    assert_eq!(runner.threads(), 2);

    let fresh = AtomicUsize::new(0);
    let mut surfaces: Vec<Surface> = (0..64)
        .map(|_| Surface::new(4, 4, PixelLayout::IntArgb).unwrap())
        .collect();
    let fresh_ref = &fresh;
    let mut jobs: Vec<_> = surfaces
        .iter_mut()
        .map(|s| {
            move |ctx: &mut TileContext| -> GammaResult<()> {
                if ctx.mask_capacity() == 0 {
                    fresh_ref.fetch_add(1, Ordering::SeqCst);
                }
                let rect = TileRect::new(0, 0, 4, 4);
                let mut seq = ctx.start_sequence(
                    &mut *s,
                    rect,
                    Paint::Solid(0x80FF_0000),
                    Composite::src_over(),
                )?;
                seq.render_tile(None, 0, 4, rect)?;
                seq.end();
                Ok(())
            }
        })
        .collect();

    runner.run(&mut jobs).unwrap();
    let first = fresh.load(Ordering::SeqCst);
    assert!((1..=2).contains(&first), "fresh contexts after first call: {first}");

    runner.run(&mut jobs).unwrap();
    assert_eq!(fresh.load(Ordering::SeqCst), first);
}
