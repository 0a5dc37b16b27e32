use crate::surface::{Position, SurfaceProvider, SurfaceResult, TextSurface, TipSurface};
use std::sync::{Arc, Mutex, MutexGuard};

pub type MockSurfaceId = u64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceEvent {
    Created(MockSurfaceId),
    Shown(MockSurfaceId),
    Hidden(MockSurfaceId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockSurfaceRecord {
    pub id: MockSurfaceId,
    pub owner: String,
    pub text: String,
    pub position: Position,
    pub visible: bool,
    pub hide_count: u32,
}

#[derive(Debug, Default)]
struct MockState {
    next_id: MockSurfaceId,
    fail_create: bool,
    fail_show: bool,
    events: Vec<SurfaceEvent>,
    surfaces: Vec<MockSurfaceRecord>,
}

/// Surface provider that renders nothing and records every call.
#[derive(Debug, Clone, Default)]
pub struct MockSurfaceProvider {
    state: Arc<Mutex<MockState>>,
}

impl MockSurfaceProvider {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Makes subsequent `create_surface` calls fail until reset.
    pub fn set_fail_create(&self, fail: bool) {
        self.lock().fail_create = fail;
    }

    /// Makes subsequent `TipSurface::show` calls fail until reset.
    pub fn set_fail_show(&self, fail: bool) {
        self.lock().fail_show = fail;
    }

    pub fn events(&self) -> Vec<SurfaceEvent> {
        self.lock().events.clone()
    }

    pub fn surfaces(&self) -> Vec<MockSurfaceRecord> {
        self.lock().surfaces.clone()
    }

    pub fn surface(&self, id: MockSurfaceId) -> Option<MockSurfaceRecord> {
        self.lock().surfaces.iter().find(|s| s.id == id).cloned()
    }

    pub fn visible(&self) -> Vec<MockSurfaceRecord> {
        self.lock()
            .surfaces
            .iter()
            .filter(|s| s.visible)
            .cloned()
            .collect()
    }

    pub fn visible_texts(&self) -> Vec<String> {
        self.visible().into_iter().map(|s| s.text).collect()
    }
}

impl SurfaceProvider for MockSurfaceProvider {
    type Owner = String;
    type Surface = MockSurface;

    fn create_surface(
        &self,
        owner: &String,
        content: &TextSurface,
        position: Position,
    ) -> SurfaceResult<MockSurface> {
        let mut state = self.lock();
        if state.fail_create {
            return Err("mock surface creation disabled".into());
        }

        state.next_id += 1;
        let id = state.next_id;
        state.surfaces.push(MockSurfaceRecord {
            id,
            owner: owner.clone(),
            text: content.text().to_string(),
            position,
            visible: false,
            hide_count: 0,
        });
        state.events.push(SurfaceEvent::Created(id));

        Ok(MockSurface {
            id,
            state: self.state.clone(),
        })
    }
}

#[derive(Debug)]
pub struct MockSurface {
    id: MockSurfaceId,
    state: Arc<Mutex<MockState>>,
}

impl MockSurface {
    pub fn id(&self) -> MockSurfaceId {
        self.id
    }

    fn update<F>(&self, event: SurfaceEvent, f: F)
    where
        F: FnOnce(&mut MockSurfaceRecord),
    {
        let mut state = self.state.lock().unwrap_or_else(|p| p.into_inner());
        if let Some(record) = state.surfaces.iter_mut().find(|s| s.id == self.id) {
            f(record);
        }
        state.events.push(event);
    }
}

impl TipSurface for MockSurface {
    fn show(&mut self) -> SurfaceResult<()> {
        if self.state.lock().unwrap_or_else(|p| p.into_inner()).fail_show {
            return Err("mock surface show disabled".into());
        }
        self.update(SurfaceEvent::Shown(self.id), |record| record.visible = true);
        Ok(())
    }

    fn hide(&mut self) -> SurfaceResult<()> {
        self.update(SurfaceEvent::Hidden(self.id), |record| {
            record.visible = false;
            record.hide_count += 1;
        });
        Ok(())
    }
}
