/// Values which count as "empty" for the purpose of [`Collection::compact`].
///
/// The falsy set is fixed: the empty string, numeric zero, `false`, and an
/// absent value (`None` or `()`). Everything else is truthy. In particular
/// `NaN` is truthy, and so are empty collections.
///
/// `compact` narrows the element type as it filters: an `Option<T>` element
/// comes out as `T`.
///
/// # Examples
///
/// ```
/// use async_collection::Falsy;
///
/// assert!(0u8.is_falsy());
/// assert!("".is_falsy());
/// assert!(None::<u8>.is_falsy());
/// assert!(Some(0u8).is_falsy());
/// assert_eq!(Some(3u8).into_truthy(), Some(3));
/// ```
///
/// [`Collection::compact`]: crate::Collection::compact
pub trait Falsy: Sized {
    /// The type left over once falsy values have been removed.
    type Truthy;

    /// Returns `true` if this value is in the falsy set.
    fn is_falsy(&self) -> bool;

    /// Narrow this value to its truthy type, or `None` if it is falsy.
    fn into_truthy(self) -> Option<Self::Truthy>;
}

macro_rules! impl_falsy_num {
    ($zero:expr => $($t:ty),*) => {
        $(
            impl Falsy for $t {
                type Truthy = $t;

                fn is_falsy(&self) -> bool {
                    *self == $zero
                }

                fn into_truthy(self) -> Option<Self::Truthy> {
                    (!self.is_falsy()).then_some(self)
                }
            }
        )*
    };
}

impl_falsy_num!(0 => u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize);
// `-0.0 == 0.0`, so both zeroes are falsy.
impl_falsy_num!(0.0 => f32, f64);

impl Falsy for bool {
    type Truthy = bool;

    fn is_falsy(&self) -> bool {
        !*self
    }

    fn into_truthy(self) -> Option<Self::Truthy> {
        self.then_some(true)
    }
}

impl<'s> Falsy for &'s str {
    type Truthy = &'s str;

    fn is_falsy(&self) -> bool {
        self.is_empty()
    }

    fn into_truthy(self) -> Option<Self::Truthy> {
        (!self.is_empty()).then_some(self)
    }
}

impl Falsy for String {
    type Truthy = String;

    fn is_falsy(&self) -> bool {
        self.is_empty()
    }

    fn into_truthy(self) -> Option<Self::Truthy> {
        (!self.is_empty()).then_some(self)
    }
}

impl Falsy for () {
    type Truthy = ();

    fn is_falsy(&self) -> bool {
        true
    }

    fn into_truthy(self) -> Option<Self::Truthy> {
        None
    }
}

impl<T: Falsy> Falsy for Option<T> {
    type Truthy = T::Truthy;

    fn is_falsy(&self) -> bool {
        self.as_ref().map_or(true, Falsy::is_falsy)
    }

    fn into_truthy(self) -> Option<Self::Truthy> {
        self.and_then(Falsy::into_truthy)
    }
}
