use fixmath::FixVec2;

/// Shared vertex storage for every polygon.
///
/// Each polygon owns the slice `[start, start + count)` of two parallel
/// buffers: the model-space outline given at creation and the world-space
/// vertices derived from it. Released slices stay behind as holes until
/// [`VertexArena::compact`] rebuilds the buffers.
#[derive(Clone, Debug, Default)]
pub struct VertexArena {
    model: Vec<FixVec2>,
    world: Vec<FixVec2>,
    live: usize,
}

impl VertexArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            model: Vec::with_capacity(capacity),
            world: Vec::with_capacity(capacity),
            live: 0,
        }
    }

    /// Appends a polygon outline and returns the start of its slice. The world
    /// slice starts out as a copy of the model and is expected to be refreshed
    /// by the owner right away.
    pub fn reserve(&mut self, model: &[FixVec2]) -> usize {
        let start = self.model.len();
        self.model.extend_from_slice(model);
        self.world.extend_from_slice(model);
        self.live += model.len();
        start
    }

    /// Marks a slice as dead. The storage is only reclaimed on compaction.
    pub fn release(&mut self, start: usize, count: usize) {
        debug_assert!(
            start + count <= self.model.len(),
            "released slice {}..{} is outside the arena (len {})",
            start,
            start + count,
            self.model.len()
        );
        self.live = self.live.saturating_sub(count);
    }

    #[inline(always)]
    pub fn model(&self, start: usize, count: usize) -> &[FixVec2] {
        &self.model[start..start + count]
    }

    #[inline(always)]
    pub fn world(&self, start: usize, count: usize) -> &[FixVec2] {
        &self.world[start..start + count]
    }

    /// Model slice paired with the mutable world slice it feeds.
    #[inline(always)]
    pub fn model_and_world_mut(
        &mut self,
        start: usize,
        count: usize,
    ) -> (&[FixVec2], &mut [FixVec2]) {
        (
            &self.model[start..start + count],
            &mut self.world[start..start + count],
        )
    }

    /// Buffer length including holes.
    pub fn len(&self) -> usize {
        self.model.len()
    }

    pub fn is_empty(&self) -> bool {
        self.model.is_empty()
    }

    /// Vertices still owned by a polygon.
    pub fn live_len(&self) -> usize {
        self.live
    }

    pub fn holes(&self) -> usize {
        self.model.len() - self.live
    }

    /// Copies every live slice, in the order given, into fresh buffers and
    /// rewrites each slice start. `slices` yields `(start, count)` handles by
    /// mutable reference. Returns the number of reclaimed vertices.
    pub fn compact<'a, I>(&mut self, slices: I) -> usize
    where
        I: IntoIterator<Item = (&'a mut usize, usize)>,
    {
        let mut model = Vec::with_capacity(self.live);
        let mut world = Vec::with_capacity(self.live);
        for (start, count) in slices {
            let new_start = model.len();
            model.extend_from_slice(&self.model[*start..*start + count]);
            world.extend_from_slice(&self.world[*start..*start + count]);
            *start = new_start;
        }
        let reclaimed = self.model.len() - model.len();
        self.live = model.len();
        self.model = model;
        self.world = world;
        reclaimed
    }
}
