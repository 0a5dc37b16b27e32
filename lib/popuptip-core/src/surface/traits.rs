use crate::surface::{Position, SurfaceResult, TextSurface};

/// Produces floating, borderless surfaces for tips.
///
/// Implementations wrap whatever windowing toolkit the host uses. Calls are made
/// while the controller holds its lock, so they must not call back into it.
pub trait SurfaceProvider
where
    Self: Send + Sync + 'static,
{
    /// Handle identifying the component that hosts the tip. Opaque to the
    /// controller, it is only passed back to the provider.
    type Owner: Clone + Send + 'static;
    type Surface: TipSurface;

    /// Creates a surface anchored at `position` relative to `owner`, rendering
    /// `content`. The surface should not be visible until `show` is called.
    fn create_surface(
        &self,
        owner: &Self::Owner,
        content: &TextSurface,
        position: Position,
    ) -> SurfaceResult<Self::Surface>;
}

pub trait TipSurface
where
    Self: Sized + Send + 'static,
{
    fn show(&mut self) -> SurfaceResult<()>;

    /// Hides and disposes the surface. It is not shown again afterwards.
    fn hide(&mut self) -> SurfaceResult<()>;
}
