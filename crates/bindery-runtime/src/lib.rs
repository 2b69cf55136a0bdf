//! Runtime support for bindery-generated bindings.
//!
//! Generated handle types implement [`FfiHandle`], plus [`Upcast`] once per ancestor.
//! Under multiple inheritance an ancestor's subobject may live at a different address than
//! the instance itself, so every cross-class view goes through the foreign side's own
//! conversion and never reinterprets an address.

use std::fmt;

/// A Copy-able, identity-only reference to a foreign instance.
pub trait FfiHandle {
    /// Opaque pointee.
    type Raw;

    fn as_raw(&self) -> *mut Self::Raw;

    /// # Safety
    ///
    /// `raw` must point to a live foreign instance of the handle's class (or to that
    /// class's subobject of a descendant), or be null if the caller never dereferences
    /// the handle.
    unsafe fn from_raw(raw: *mut Self::Raw) -> Self;
}

/// A handle that can be viewed as its ancestor `To`.
pub trait Upcast<To: FfiHandle>: FfiHandle {
    /// Address of the `To` subobject of this instance.
    fn upcast_raw(&self) -> *mut To::Raw;

    /// # Safety
    ///
    /// `raw` must address the `To` subobject of a live instance of `Self`'s class.
    unsafe fn downcast_raw(raw: *mut To::Raw) -> Self;
}

impl<H: FfiHandle> Upcast<H> for H {
    fn upcast_raw(&self) -> *mut H::Raw {
        self.as_raw()
    }

    unsafe fn downcast_raw(raw: *mut H::Raw) -> Self {
        unsafe { H::from_raw(raw) }
    }
}

/// View `handle` as its ancestor `To`.
pub fn upcast<From: Upcast<To>, To: FfiHandle>(handle: &From) -> To {
    // SAFETY: `upcast_raw` addresses the `To` subobject of a live instance.
    unsafe { To::from_raw(<From as Upcast<To>>::upcast_raw(handle)) }
}

/// Narrow `handle` to the descendant `From`.
///
/// # Safety
///
/// The runtime type of the foreign instance must be `From`'s class or a subclass of it.
/// Nothing checks this.
pub unsafe fn downcast<From: Upcast<To>, To: FfiHandle>(handle: To) -> From {
    unsafe { <From as Upcast<To>>::downcast_raw(handle.as_raw()) }
}

/// Whether `a` and the `To` view of `b` are the same foreign subobject.
pub fn same_instance<To: FfiHandle, From: Upcast<To>>(a: &To, b: &From) -> bool {
    a.as_raw() == <From as Upcast<To>>::upcast_raw(b)
}

/// Identity formatting shared by generated `Display`/`Debug` impls: `Name@0x...`.
pub fn fmt_handle(name: &str, raw: *const (), f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{name}@{raw:p}")
}
