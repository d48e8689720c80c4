use std::ptr::NonNull;
use std::rc::Rc;

/// Release action bound to one native handle at acquisition time.
type ReleaseFn<T> = unsafe extern "C" fn(*mut T);

struct Owner<T> {
    ptr: NonNull<T>,
    release: Option<ReleaseFn<T>>,
}

impl<T> Drop for Owner<T> {
    fn drop(&mut self) {
        if let Some(release) = self.release {
            // SAFETY: `ptr` was acquired from the native call that produced
            // it, has not been released before (this Drop runs once, when
            // the last SharedHandle clone goes away), and `release` is the
            // matching native release function.
            unsafe { release(self.ptr.as_ptr()) }
        }
    }
}

/// Reference-counted ownership of one opaque native pointer.
///
/// Cloning shares the same acquisition; the bound release function runs
/// exactly once, when the last clone is dropped. Handles acquired through
/// [`SharedHandle::acquire_non_owning`] never release; that mode exists
/// solely so an already-owned native context can be handed back across the
/// writer callback boundary as a first-class value without creating a second
/// release obligation.
///
/// `Rc`-based on purpose: the native API gives no thread-safety guarantees,
/// so the wrappers are `!Send`/`!Sync` and sharing across threads is the
/// caller's problem to structure (whole values stay thread-local).
pub(crate) struct SharedHandle<T> {
    owner: Rc<Owner<T>>,
}

// Manual impl: the pointee is an opaque native type, so no `T: Debug`
// bound is possible; the pointer value is the only printable state.
impl<T> std::fmt::Debug for SharedHandle<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedHandle")
            .field("ptr", &self.owner.ptr)
            .finish()
    }
}

impl<T> Clone for SharedHandle<T> {
    fn clone(&self) -> Self {
        Self {
            owner: Rc::clone(&self.owner),
        }
    }
}

impl<T> SharedHandle<T> {
    /// Take ownership of a freshly obtained native pointer. Returns `None`
    /// for a null pointer; callers turn that into their own error.
    ///
    /// # Safety
    ///
    /// `ptr` must be a live handle whose matching release function is
    /// `release`, and ownership must not be held elsewhere.
    pub(crate) unsafe fn acquire(ptr: *mut T, release: ReleaseFn<T>) -> Option<Self> {
        NonNull::new(ptr).map(|ptr| Self {
            owner: Rc::new(Owner {
                ptr,
                release: Some(release),
            }),
        })
    }

    /// Wrap a pointer without taking a release obligation.
    ///
    /// # Safety
    ///
    /// `ptr` must stay live for as long as any clone of the returned handle
    /// is reachable; the owner further up the stack keeps it alive during
    /// the synchronous callback this mode serves.
    pub(crate) unsafe fn acquire_non_owning(ptr: *mut T) -> Option<Self> {
        NonNull::new(ptr).map(|ptr| Self {
            owner: Rc::new(Owner { ptr, release: None }),
        })
    }

    /// Raw pointer for passing into native calls.
    pub(crate) fn as_ptr(&self) -> *mut T {
        self.owner.ptr.as_ptr()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    // The harness runs tests concurrently, so each test owns its counter.

    #[test]
    fn release_runs_exactly_once_for_all_clones() {
        static RELEASES: AtomicUsize = AtomicUsize::new(0);
        unsafe extern "C" fn count_release(_ptr: *mut u32) {
            RELEASES.fetch_add(1, Ordering::SeqCst);
        }

        let mut target = 7u32;
        {
            let handle =
                unsafe { SharedHandle::acquire(&mut target as *mut u32, count_release) }.unwrap();
            let clones: Vec<_> = (0..8).map(|_| handle.clone()).collect();
            drop(clones);
            // All but the original dropped; target still reachable.
            assert_eq!(RELEASES.load(Ordering::SeqCst), 0);
            assert_eq!(unsafe { *handle.as_ptr() }, 7);
        }
        assert_eq!(RELEASES.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn non_owning_never_releases() {
        let mut target = 1u32;
        {
            let handle =
                unsafe { SharedHandle::acquire_non_owning(&mut target as *mut u32) }.unwrap();
            let _clone = handle.clone();
        }
        // No release action exists on this path; the target is untouched
        // and still ours.
        assert_eq!(target, 1);
    }

    #[test]
    fn null_pointer_is_rejected() {
        static RELEASES: AtomicUsize = AtomicUsize::new(0);
        unsafe extern "C" fn count_release(_ptr: *mut u32) {
            RELEASES.fetch_add(1, Ordering::SeqCst);
        }

        assert!(
            unsafe { SharedHandle::<u32>::acquire(std::ptr::null_mut(), count_release) }.is_none()
        );
        assert!(unsafe { SharedHandle::<u32>::acquire_non_owning(std::ptr::null_mut()) }.is_none());
        // Nothing was acquired, so nothing may have been released.
        assert_eq!(RELEASES.load(Ordering::SeqCst), 0);
    }
}
