/// Lock that lets several [`Pin`](crate::Pin)s drive one [`Mcp23017`](crate::Mcp23017).
///
/// Changing a single pin rewrites a whole IODIR or OLAT byte from the driver's shadow.  Two pins
/// of the same bank doing that at the same time would lose one of the changes, so the
/// [`Expander`](crate::Expander) keeps the driver behind a `PortMutex` and every pin operation
/// runs inside [`lock()`](PortMutex::lock).
///
/// Provided implementations:
///
/// - [`core::cell::RefCell`]: always available.  Pins and driver live in one execution context.
/// - [`std::sync::Mutex`]: with the `std` feature.  A poisoned lock is recovered, since the shadow
///   is only ever committed after a complete register write.
/// - `critical_section::Mutex<RefCell<_>>`: with the `critical-section` feature, for pins used
///   from interrupt handlers.
///
/// Any other lock works through a newtype, for example a `std::sync::RwLock`:
///
/// ```
/// struct WriteLocked<D>(std::sync::RwLock<D>);
///
/// impl<D> mcp23017_shadow::PortMutex for WriteLocked<D> {
///     type Port = D;
///
///     fn create(driver: D) -> Self {
///         Self(std::sync::RwLock::new(driver))
///     }
///
///     fn lock<R, F: FnOnce(&mut D) -> R>(&self, f: F) -> R {
///         f(&mut self.0.write().unwrap())
///     }
/// }
/// ```
pub trait PortMutex {
    /// Usually a [`Mcp23017`](crate::Mcp23017).
    type Port;

    /// Move `driver` into a new lock.
    fn create(driver: Self::Port) -> Self;

    /// Run `f` with exclusive access to the driver.
    fn lock<R, F: FnOnce(&mut Self::Port) -> R>(&self, f: F) -> R;
}

impl<T> PortMutex for core::cell::RefCell<T> {
    type Port = T;

    fn create(driver: T) -> Self {
        core::cell::RefCell::new(driver)
    }

    fn lock<R, F: FnOnce(&mut T) -> R>(&self, f: F) -> R {
        f(&mut self.borrow_mut())
    }
}

#[cfg(any(test, feature = "std"))]
impl<T> PortMutex for std::sync::Mutex<T> {
    type Port = T;

    fn create(driver: T) -> Self {
        std::sync::Mutex::new(driver)
    }

    fn lock<R, F: FnOnce(&mut Self::Port) -> R>(&self, f: F) -> R {
        // a panic while holding the lock cannot leave the shadow half-written
        let mut driver = match self.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        f(&mut driver)
    }
}

#[cfg(feature = "critical-section")]
impl<T> PortMutex for critical_section::Mutex<core::cell::RefCell<T>> {
    type Port = T;

    fn create(driver: T) -> Self {
        critical_section::Mutex::new(core::cell::RefCell::new(driver))
    }

    fn lock<R, F: FnOnce(&mut Self::Port) -> R>(&self, f: F) -> R {
        critical_section::with(|cs| {
            let mut driver = self.borrow_ref_mut(cs);
            f(&mut driver)
        })
    }
}
