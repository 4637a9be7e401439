// fill.rs
//
// Copyright (c) 2024  tidefill developers
//
//! Color-tolerant flood fill engine
use crate::animation::Animation;
use crate::color::distance;
use crate::error::{Error, Result};
use crate::picker::Picker;
use pix::rgb::SRgba8;
use pix::Raster;
use std::collections::VecDeque;
use std::fmt;

/// Maximum width or height accepted by [fill_rgba]
///
/// [fill_rgba]: fn.fill_rgba.html
pub const MAX_DIMENSION: u32 = 4096;

/// Grid position
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    /// Create a new point
    pub const fn new(x: i32, y: i32) -> Self {
        Point { x, y }
    }

    /// Get a point offset from this one
    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Point::new(self.x.saturating_add(dx), self.y.saturating_add(dy))
    }

    /// Get the cardinal neighbors, in north, east, south, west order
    fn neighbors(self) -> [Point; 4] {
        [
            self.offset(0, -1),
            self.offset(1, 0),
            self.offset(0, 1),
            self.offset(-1, 0),
        ]
    }
}

impl From<(i32, i32)> for Point {
    fn from((x, y): (i32, i32)) -> Self {
        Point::new(x, y)
    }
}

/// Set of visited pixels in a raster
#[derive(Clone, Debug)]
pub struct Visited {
    width: u32,
    height: u32,
    marks: Vec<bool>,
}

impl Visited {
    /// Create an empty visited set for a raster
    pub fn new(width: u32, height: u32) -> Result<Self> {
        let len = width as usize * height as usize;
        let mut marks = Vec::new();
        marks.try_reserve_exact(len)?;
        marks.resize(len, false);
        Ok(Visited {
            width,
            height,
            marks,
        })
    }

    /// Get the width
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Get the height
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Check whether a point is inside the raster
    pub fn in_bounds(&self, pt: Point) -> bool {
        pt.x >= 0
            && pt.y >= 0
            && (pt.x as u32) < self.width
            && (pt.y as u32) < self.height
    }

    /// Get the mark index of a point
    fn index(&self, pt: Point) -> Option<usize> {
        if self.in_bounds(pt) {
            Some(pt.y as usize * self.width as usize + pt.x as usize)
        } else {
            None
        }
    }

    /// Check whether a point has been visited (never true out of bounds)
    pub fn contains(&self, pt: Point) -> bool {
        self.index(pt).map_or(false, |i| self.marks[i])
    }

    /// Mark a point visited.
    ///
    /// Returns `true` if it was not visited before.
    pub fn insert(&mut self, pt: Point) -> bool {
        match self.index(pt) {
            Some(i) if !self.marks[i] => {
                self.marks[i] = true;
                true
            }
            _ => false,
        }
    }

    /// Count visited points
    pub fn count(&self) -> usize {
        self.marks.iter().filter(|m| **m).count()
    }
}

/// Fill traversal order
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Order {
    /// Queue frontier (grows in rings around the seed)
    #[default]
    BreadthFirst,
    /// Stack frontier (follows one path until blocked)
    DepthFirst,
}

impl fmt::Display for Order {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Order::BreadthFirst => write!(fmt, "BFS"),
            Order::DepthFirst => write!(fmt, "DFS"),
        }
    }
}

/// Pixels waiting to be filled
#[derive(Debug)]
enum Frontier {
    Queue(VecDeque<Point>),
    Stack(Vec<Point>),
}

impl Frontier {
    /// Create an empty frontier for a traversal order
    fn new(order: Order) -> Self {
        match order {
            Order::BreadthFirst => Frontier::Queue(VecDeque::new()),
            Order::DepthFirst => Frontier::Stack(Vec::new()),
        }
    }

    /// Add a point
    fn push(&mut self, pt: Point) {
        match self {
            Frontier::Queue(q) => q.push_back(pt),
            Frontier::Stack(s) => s.push(pt),
        }
    }

    /// Take the next point
    fn pop(&mut self) -> Option<Point> {
        match self {
            Frontier::Queue(q) => q.pop_front(),
            Frontier::Stack(s) => s.pop(),
        }
    }

    /// Get the number of waiting points
    fn len(&self) -> usize {
        match self {
            Frontier::Queue(q) => q.len(),
            Frontier::Stack(s) => s.len(),
        }
    }
}

/// Flood fill configuration
#[derive(Clone, Debug, PartialEq)]
pub struct FillConfig {
    /// Starting point
    seed: Point,
    /// Maximum color distance from the seed color
    tolerance: f64,
    /// Filled pixels between captured frames (0: final frame only)
    frame_freq: usize,
    /// Maximum number of intermediate frames
    max_frames: Option<usize>,
    /// Traversal order
    order: Order,
    /// Replacement color picker
    picker: Picker,
}

impl Default for FillConfig {
    fn default() -> Self {
        FillConfig {
            seed: Point::default(),
            tolerance: 0.1,
            frame_freq: 1000,
            max_frames: None,
            order: Order::default(),
            picker: Picker::default(),
        }
    }
}

impl FillConfig {
    /// Set the seed point
    pub fn with_seed(mut self, seed: Point) -> Self {
        self.seed = seed;
        self
    }

    /// Set the color tolerance
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Set the number of filled pixels between frames
    pub fn with_frame_freq(mut self, frame_freq: usize) -> Self {
        self.frame_freq = frame_freq;
        self
    }

    /// Set the maximum number of intermediate frames
    pub fn with_max_frames(mut self, max_frames: Option<usize>) -> Self {
        self.max_frames = max_frames;
        self
    }

    /// Set the traversal order
    pub fn with_order(mut self, order: Order) -> Self {
        self.order = order;
        self
    }

    /// Set the color picker
    pub fn with_picker(mut self, picker: Picker) -> Self {
        self.picker = picker;
        self
    }

    /// Get the seed point
    pub fn seed(&self) -> Point {
        self.seed
    }

    /// Get the color tolerance
    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Get the frame frequency
    pub fn frame_freq(&self) -> usize {
        self.frame_freq
    }

    /// Get the maximum number of intermediate frames
    pub fn max_frames(&self) -> Option<usize> {
        self.max_frames
    }

    /// Get the traversal order
    pub fn order(&self) -> Order {
        self.order
    }

    /// Get the color picker
    pub fn picker(&self) -> &Picker {
        &self.picker
    }

    /// Check the configuration
    pub fn validate(&self) -> Result<()> {
        if !self.tolerance.is_finite() || self.tolerance < 0.0 {
            return Err(Error::InvalidTolerance);
        }
        self.picker.validate()
    }

    /// Check whether a frame should be captured after `filled` pixels
    fn is_frame_due(&self, filled: usize, captured: usize) -> bool {
        self.frame_freq > 0
            && filled % self.frame_freq == 0
            && self.max_frames.map_or(true, |m| captured < m)
    }
}

/// Progress observer: called with (filled pixels, queued pixels)
type Progress<'a> = Box<dyn FnMut(usize, usize) + 'a>;

/// Flood fill runner
pub struct FloodFill<'a> {
    /// Fill configuration
    config: FillConfig,
    /// Progress observer
    progress: Option<Progress<'a>>,
}

impl fmt::Debug for FloodFill<'_> {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        fmt.debug_struct("FloodFill")
            .field("config", &self.config)
            .field("progress", &self.progress.is_some())
            .finish()
    }
}

/// Make a deep copy of a raster
pub(crate) fn copy_raster(raster: &Raster<SRgba8>) -> Result<Raster<SRgba8>> {
    let mut pixels = Vec::new();
    pixels.try_reserve_exact(raster.pixels().len())?;
    pixels.extend_from_slice(raster.pixels());
    Ok(Raster::with_pixels(raster.width(), raster.height(), pixels))
}

impl<'a> FloodFill<'a> {
    /// Create a new flood fill runner
    pub fn new(config: FillConfig) -> Self {
        FloodFill {
            config,
            progress: None,
        }
    }

    /// Attach a progress observer.
    ///
    /// It is called once per filled pixel, before its neighbors are queued.
    pub fn with_progress<F>(mut self, progress: F) -> Self
    where
        F: FnMut(usize, usize) + 'a,
    {
        self.progress = Some(Box::new(progress));
        self
    }

    /// Get the configuration
    pub fn config(&self) -> &FillConfig {
        &self.config
    }

    /// Fill a region of a source raster.
    ///
    /// The source is not modified.  An empty raster or a seed outside of it
    /// results in an empty animation.
    pub fn run(&mut self, source: &Raster<SRgba8>) -> Result<Animation> {
        self.config.validate()?;
        let (width, height) = (source.width(), source.height());
        let seed = self.config.seed;
        let mut visited = Visited::new(width, height)?;
        if !visited.in_bounds(seed) {
            warn!("fill: seed {:?} outside {}x{} raster", seed, width, height);
            return Ok(Animation::default());
        }
        let picker = self.config.picker.resolve(width, height)?;
        let mut canvas = copy_raster(source)?;
        let target = source.pixel(seed.x, seed.y);
        let tolerance = self.config.tolerance;
        debug!(
            "fill: {} from {:?}, tolerance {}",
            self.config.order, seed, tolerance
        );
        let mut animation = Animation::default();
        let mut frontier = Frontier::new(self.config.order);
        visited.insert(seed);
        frontier.push(seed);
        let mut filled = 0;
        while let Some(pt) = frontier.pop() {
            let original = canvas.pixel(pt.x, pt.y);
            *canvas.pixel_mut(pt.x, pt.y) =
                picker.color_for(pt, original, &visited);
            filled += 1;
            if self.config.is_frame_due(filled, animation.len()) {
                animation.push(&canvas)?;
            }
            if let Some(progress) = &mut self.progress {
                progress(filled, frontier.len());
            }
            for n in pt.neighbors() {
                if !visited.in_bounds(n) || visited.contains(n) {
                    continue;
                }
                if distance(source.pixel(n.x, n.y), target) <= tolerance {
                    visited.insert(n);
                    frontier.push(n);
                }
            }
        }
        animation.push(&canvas)?;
        debug!("fill: {} pixels, {} frames", filled, animation.len());
        Ok(animation)
    }
}

/// Fill a region of a raster.
pub fn flood_fill(
    source: &Raster<SRgba8>,
    config: &FillConfig,
) -> Result<Animation> {
    FloodFill::new(config.clone()).run(source)
}

/// Fill a region of a packed RGBA8 buffer.
///
/// Width and height must be non-zero and at most [MAX_DIMENSION]; the buffer
/// must hold exactly `width * height * 4` bytes.
///
/// [MAX_DIMENSION]: constant.MAX_DIMENSION.html
pub fn fill_rgba(
    buffer: &[u8],
    width: u32,
    height: u32,
    config: &FillConfig,
) -> Result<Animation> {
    if width == 0
        || height == 0
        || width > MAX_DIMENSION
        || height > MAX_DIMENSION
        || buffer.len() != width as usize * height as usize * 4
    {
        return Err(Error::InvalidRasterDimensions);
    }
    let mut pixels = Vec::new();
    pixels.try_reserve_exact(buffer.len() / 4)?;
    pixels.extend(
        buffer
            .chunks_exact(4)
            .map(|c| SRgba8::new(c[0], c[1], c[2], c[3])),
    );
    let raster = Raster::with_pixels(width, height, pixels);
    flood_fill(&raster, config)
}

#[cfg(test)]
mod test {
    use super::*;

    fn gray() -> SRgba8 {
        SRgba8::new(100, 100, 100, 255)
    }

    fn black() -> SRgba8 {
        SRgba8::new(0, 0, 0, 255)
    }

    fn red() -> SRgba8 {
        SRgba8::new(255, 0, 0, 255)
    }

    fn blue() -> SRgba8 {
        SRgba8::new(0, 0, 255, 255)
    }

    fn count(raster: &Raster<SRgba8>, clr: SRgba8) -> usize {
        raster.pixels().iter().filter(|p| **p == clr).count()
    }

    fn solid(order: Order) -> FillConfig {
        FillConfig::default()
            .with_order(order)
            .with_frame_freq(0)
            .with_picker(Picker::Solid(red()))
    }

    #[test]
    fn uniform_bfs() {
        let src = Raster::with_color(10, 10, gray());
        let anim = flood_fill(&src, &solid(Order::BreadthFirst)).unwrap();
        assert_eq!(anim.len(), 1);
        assert_eq!(count(anim.final_frame().unwrap(), red()), 100);
        // source is untouched
        assert_eq!(count(&src, gray()), 100);
    }

    #[test]
    fn uniform_dfs() {
        let src = Raster::with_color(10, 10, gray());
        let cfg = solid(Order::DepthFirst).with_seed(Point::new(7, 3));
        let anim = flood_fill(&src, &cfg).unwrap();
        assert_eq!(count(anim.final_frame().unwrap(), red()), 100);
    }

    #[test]
    fn stripes() {
        let src = Raster::with_color(20, 20, gray());
        let cfg = FillConfig::default()
            .with_picker(Picker::stripe(red(), blue(), 5))
            .with_frame_freq(0);
        let anim = flood_fill(&src, &cfg).unwrap();
        let frame = anim.final_frame().unwrap();
        for y in 0..20 {
            for x in 0..20 {
                let expected = if (x + y) / 5 % 2 == 0 { red() } else { blue() };
                assert_eq!(frame.pixel(x, y), expected);
            }
        }
    }

    #[test]
    fn tolerance_barrier() {
        let mut src = Raster::with_color(10, 10, gray());
        for y in 0..10 {
            *src.pixel_mut(5, y) = black();
        }
        let cfg = solid(Order::BreadthFirst)
            .with_seed(Point::new(2, 5))
            .with_tolerance(0.05);
        let anim = flood_fill(&src, &cfg).unwrap();
        let frame = anim.final_frame().unwrap();
        assert_eq!(count(frame, red()), 50);
        for y in 0..10 {
            assert_eq!(frame.pixel(4, y), red());
            assert_eq!(frame.pixel(5, y), black());
            assert_eq!(frame.pixel(6, y), gray());
        }
    }

    #[test]
    fn isolated_seed() {
        let mut src = Raster::with_color(3, 3, black());
        *src.pixel_mut(1, 1) = gray();
        let cfg = solid(Order::BreadthFirst)
            .with_seed(Point::new(1, 1))
            .with_tolerance(0.0);
        let anim = flood_fill(&src, &cfg).unwrap();
        assert_eq!(anim.len(), 1);
        let frame = anim.final_frame().unwrap();
        assert_eq!(count(frame, red()), 1);
        assert_eq!(frame.pixel(1, 1), red());
    }

    #[test]
    fn frame_frequency() {
        let src = Raster::with_color(10, 10, gray());
        let cfg = FillConfig::default().with_frame_freq(25);
        let anim = flood_fill(&src, &cfg).unwrap();
        // 25, 50, 75, 100 plus the final frame
        assert_eq!(anim.len(), 5);
        let reds: Vec<usize> =
            anim.frames().map(|f| count(f, red())).collect();
        assert_eq!(reds, vec![25, 50, 75, 100, 100]);
        let cfg = cfg.with_frame_freq(0);
        assert_eq!(flood_fill(&src, &cfg).unwrap().len(), 1);
        let cfg = cfg.with_frame_freq(1000);
        assert_eq!(flood_fill(&src, &cfg).unwrap().len(), 1);
    }

    #[test]
    fn frame_cap() {
        let src = Raster::with_color(10, 10, gray());
        let cfg = FillConfig::default()
            .with_frame_freq(10)
            .with_max_frames(Some(3));
        let anim = flood_fill(&src, &cfg).unwrap();
        assert_eq!(anim.len(), 4);
        assert_eq!(count(anim.frame(2).unwrap(), red()), 30);
        assert_eq!(count(anim.final_frame().unwrap(), red()), 100);
    }

    #[test]
    fn deterministic() {
        let mut src = Raster::with_color(16, 16, gray());
        for i in 0..16 {
            *src.pixel_mut(i, (i * 7) % 16) = black();
        }
        for order in [Order::BreadthFirst, Order::DepthFirst] {
            let cfg = FillConfig::default()
                .with_order(order)
                .with_frame_freq(7)
                .with_seed(Point::new(3, 9));
            let a = flood_fill(&src, &cfg).unwrap();
            let b = flood_fill(&src, &cfg).unwrap();
            assert_eq!(a.len(), b.len());
            for (fa, fb) in a.frames().zip(b.frames()) {
                assert_eq!(fa.pixels(), fb.pixels());
            }
        }
    }

    #[test]
    fn orders_differ() {
        let src = Raster::with_color(8, 8, gray());
        let bfs = FillConfig::default()
            .with_frame_freq(4)
            .with_seed(Point::new(4, 4));
        let dfs = bfs.clone().with_order(Order::DepthFirst);
        let a = flood_fill(&src, &bfs).unwrap();
        let b = flood_fill(&src, &dfs).unwrap();
        assert_eq!(a.len(), b.len());
        assert_ne!(a.frame(1).unwrap().pixels(), b.frame(1).unwrap().pixels());
        assert_eq!(
            a.final_frame().unwrap().pixels(),
            b.final_frame().unwrap().pixels()
        );
    }

    #[test]
    fn bfs_order() {
        let src = Raster::with_color(5, 5, gray());
        let cfg = solid(Order::BreadthFirst)
            .with_seed(Point::new(2, 2))
            .with_frame_freq(5);
        let anim = flood_fill(&src, &cfg).unwrap();
        // seed, then north, east, south, west
        let frame = anim.frame(0).unwrap();
        for (x, y) in [(2, 2), (2, 1), (3, 2), (2, 3), (1, 2)] {
            assert_eq!(frame.pixel(x, y), red());
        }
        assert_eq!(count(frame, red()), 5);
    }

    #[test]
    fn dfs_order() {
        let src = Raster::with_color(3, 3, gray());
        let cfg = solid(Order::DepthFirst)
            .with_seed(Point::new(1, 1))
            .with_frame_freq(2);
        let anim = flood_fill(&src, &cfg).unwrap();
        // last pushed neighbor (west) is filled second
        let frame = anim.frame(0).unwrap();
        assert_eq!(frame.pixel(1, 1), red());
        assert_eq!(frame.pixel(0, 1), red());
        assert_eq!(count(frame, red()), 2);
    }

    #[test]
    fn empty_raster() {
        let src = Raster::with_color(0, 0, gray());
        let anim = flood_fill(&src, &FillConfig::default()).unwrap();
        assert!(anim.is_empty());
    }

    #[test]
    fn seed_out_of_bounds() {
        let src = Raster::with_color(4, 4, gray());
        for seed in [Point::new(-1, 0), Point::new(4, 0), Point::new(0, 9)] {
            let cfg = FillConfig::default().with_seed(seed);
            assert!(flood_fill(&src, &cfg).unwrap().is_empty());
        }
    }

    #[test]
    fn progress() {
        let src = Raster::with_color(6, 6, gray());
        let mut calls = vec![];
        FloodFill::new(FillConfig::default())
            .with_progress(|filled, queued| calls.push((filled, queued)))
            .run(&src)
            .unwrap();
        assert_eq!(calls.len(), 36);
        assert_eq!(calls[0], (1, 0));
        assert_eq!(calls[35], (36, 0));
        assert!(calls.iter().enumerate().all(|(i, c)| c.0 == i + 1));
    }

    #[test]
    fn quarter_center() {
        let src = Raster::with_color(10, 10, gray());
        let cfg = FillConfig::default()
            .with_frame_freq(0)
            .with_picker(Picker::quarter(gray(), 40));
        let anim = flood_fill(&src, &cfg).unwrap();
        let frame = anim.final_frame().unwrap();
        assert_eq!(frame.pixel(4, 4), gray());
        assert_ne!(frame.pixel(5, 4), gray());
        assert_ne!(frame.pixel(5, 4), frame.pixel(4, 5));
        assert_ne!(frame.pixel(4, 5), frame.pixel(5, 5));
        assert_eq!(frame.pixel(9, 0), frame.pixel(5, 4));
    }

    #[test]
    fn border() {
        let src = Raster::with_color(10, 10, gray());
        let cfg = solid(Order::BreadthFirst)
            .with_seed(Point::new(5, 5))
            .with_picker(Picker::border(red(), black(), 1));
        let anim = flood_fill(&src, &cfg).unwrap();
        let frame = anim.final_frame().unwrap();
        // raster edges always see out-of-bounds cells
        for i in 0..10 {
            assert_eq!(frame.pixel(i, 0), black());
            assert_eq!(frame.pixel(0, i), black());
            assert_eq!(frame.pixel(i, 9), black());
            assert_eq!(frame.pixel(9, i), black());
        }
        // the seed is colored before its neighbors are visited
        assert_eq!(frame.pixel(5, 5), black());
    }

    #[test]
    fn invalid_config() {
        let src = Raster::with_color(4, 4, gray());
        for tolerance in [-0.1, f64::NAN, f64::INFINITY] {
            let cfg = FillConfig::default().with_tolerance(tolerance);
            assert!(matches!(
                flood_fill(&src, &cfg),
                Err(Error::InvalidTolerance)
            ));
        }
        let cfg = FillConfig::default()
            .with_picker(Picker::stripe(red(), blue(), 0));
        assert!(matches!(
            flood_fill(&src, &cfg),
            Err(Error::InvalidStripeWidth)
        ));
    }

    #[test]
    fn rgba_buffer() {
        let buffer = [100u8, 100, 100, 255].repeat(12);
        let cfg = solid(Order::BreadthFirst);
        let anim = fill_rgba(&buffer, 4, 3, &cfg).unwrap();
        let frame = anim.final_frame().unwrap();
        assert_eq!(frame.width(), 4);
        assert_eq!(frame.height(), 3);
        assert_eq!(count(frame, red()), 12);
        for (w, h, len) in [(0, 3, 0), (4, 3, 47), (5000, 1, 20_000)] {
            assert!(matches!(
                fill_rgba(&buffer[..len.min(48)], w, h, &cfg),
                Err(Error::InvalidRasterDimensions)
            ));
        }
    }

    #[test]
    fn visited() {
        let mut v = Visited::new(3, 2).unwrap();
        assert!(v.insert(Point::new(2, 1)));
        assert!(!v.insert(Point::new(2, 1)));
        assert!(!v.insert(Point::new(3, 1)));
        assert!(v.contains(Point::new(2, 1)));
        assert!(!v.contains(Point::new(-1, 1)));
        assert_eq!(v.count(), 1);
    }
}
