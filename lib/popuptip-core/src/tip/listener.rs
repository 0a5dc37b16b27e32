/// Receives the next close of a tip. Consumed by the call that fires it.
pub trait CloseListener: Send + 'static {
    fn on_close(self: Box<Self>);
}

impl<F> CloseListener for F
where
    F: FnOnce() + Send + 'static,
{
    fn on_close(self: Box<Self>) {
        (*self)()
    }
}
