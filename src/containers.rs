use std::ops::{Deref, DerefMut};

cfg_if::cfg_if! {
	if #[cfg(feature = "multithreaded")] {
		type Shared<T> = std::sync::Arc<T>;
		type Lock<T> = std::sync::RwLock<T>;

		pub trait MaybeSendSync: Send + Sync {}
		impl<T: Send + Sync + ?Sized> MaybeSendSync for T {}
	} else {
		type Shared<T> = std::rc::Rc<T>;
		type Lock<T> = std::cell::RefCell<T>;

		pub trait MaybeSendSync {}
		impl<T: ?Sized> MaybeSendSync for T {}
	}
}

/// Shared ownership of a value; `Arc` when `multithreaded` is enabled, `Rc` otherwise.
#[derive(Debug)]
pub struct RefCount<T: ?Sized>(Shared<T>);

#[cfg(feature = "multithreaded")]
sa::assert_impl_all!(RefCount<str>: Send, Sync);

impl<T: ?Sized> RefCount<T> {
	/// Whether both refer to the same allocation.
	pub fn ptr_eq(&self, rhs: &Self) -> bool {
		Shared::ptr_eq(&self.0, &rhs.0)
	}

	/// The address of the allocation. Values sharing it share an identity.
	pub fn addr(&self) -> usize {
		Shared::as_ptr(&self.0).cast::<()>() as usize
	}
}

impl<T: ?Sized> Clone for RefCount<T> {
	fn clone(&self) -> Self {
		Self(Shared::clone(&self.0))
	}
}

impl<T> From<T> for RefCount<T> {
	fn from(value: T) -> Self {
		Self(Shared::new(value))
	}
}

impl<T: ?Sized> From<Box<T>> for RefCount<T> {
	fn from(boxed: Box<T>) -> Self {
		Self(Shared::from(boxed))
	}
}

impl<T: ?Sized> Deref for RefCount<T> {
	type Target = T;

	fn deref(&self) -> &T {
		&self.0
	}
}

/// The contents of a container that can still change after it's shared; `RwLock` when
/// `multithreaded` is enabled, `RefCell` otherwise.
///
/// Containers stay mutable after construction, so values can refer to themselves.
#[derive(Debug)]
pub struct Mutable<T>(Lock<T>);

#[cfg(feature = "multithreaded")]
sa::assert_impl_all!(Mutable<Vec<u8>>: Send, Sync);

impl<T> From<T> for Mutable<T> {
	fn from(value: T) -> Self {
		Self(Lock::new(value))
	}
}

impl<T> Mutable<T> {
	/// Borrows the contents. A lock poisoned by a panicking renderer is still readable.
	pub fn read(&self) -> impl Deref<Target = T> + '_ {
		#[cfg(feature = "multithreaded")]
		let guard = self.0.read().unwrap_or_else(std::sync::PoisonError::into_inner);

		#[cfg(not(feature = "multithreaded"))]
		let guard = self.0.borrow();

		guard
	}

	pub fn write(&self) -> impl DerefMut<Target = T> + '_ {
		#[cfg(feature = "multithreaded")]
		let guard = self.0.write().unwrap_or_else(std::sync::PoisonError::into_inner);

		#[cfg(not(feature = "multithreaded"))]
		let guard = self.0.borrow_mut();

		guard
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn identity_follows_the_allocation() {
		let text = RefCount::<str>::from(Box::<str>::from("abc"));
		let same = text.clone();
		let other = RefCount::<str>::from(Box::<str>::from("abc"));

		assert!(text.ptr_eq(&same));
		assert_eq!(text.addr(), same.addr());
		assert!(!text.ptr_eq(&other));
		assert_eq!(&*other, "abc");
	}

	#[test]
	fn contents_change_in_place() {
		let items = Mutable::from(vec![1]);
		items.write().push(2);

		assert_eq!(*items.read(), [1, 2]);
	}
}
