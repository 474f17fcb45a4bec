use std::borrow::Cow;

// This defines the `Accessor` trait, used to define unified getters/setters for commonly
// accessed tag values.
//
// Usage:
//
// accessor_trait! {
//     [field_name]<type, owned_type>
// }
//
// * `field_name` is the name of the method to access the field. If a name consists of multiple segments,
// such as `album_artist`, they should be separated by spaces like so: [album artist]<type, owned_type>.
//
// * `type` is the return type for `Accessor::field_name`, `owned_type` is taken by the setter.
macro_rules! accessor_trait {
	($([$($name:tt)+] < $ty:ty, $owned_ty:ty >),+ $(,)?) => {
		/// Provides accessors for common items
		///
		/// Every tag type implements this, which allows reading and editing the basic fields
		/// without knowing the format of the file.
		///
		/// Note that for tag formats supporting multiple values, the behavior of any setter methods is
		/// to **overwrite**, not append.
		pub trait Accessor {
			$(
				accessor_trait! { @GET_METHOD [$($name)+] Option<$ty> }

				accessor_trait! { @SET_METHOD [$($name)+] $owned_ty }

				accessor_trait! { @REMOVE_METHOD [$($name)+] }
			)+
		}
	};
	(@GET_METHOD [$name:tt $($other:tt)*] Option<$ret_ty:ty>) => {
		paste::paste! {
			#[doc = "Returns the " $name $(" " $other)* "."]
			///
			/// For formats that support multiple definitions of the same item, this will only return the first occurrence.
			///
			/// # Example
			///
			/// ```rust
			/// use tagcodec::tag::{Accessor, Tag, TagType};
			///
			/// let tag = Tag::new(TagType::Id3v2);
			#[doc = "assert_eq!(tag." $name $(_ $other)* "(), None);"]
			/// ```
			fn [<
				$name $(_ $other)*
			>] (&self) -> Option<$ret_ty> { None }
		}
	};
	(@SET_METHOD [$name:tt $($other:tt)*] $owned_ty:ty) => {
		paste::paste! {
			#[doc = "Sets the " $name $(" " $other)* "."]
			///
			/// For formats that support multiple definitions of the same item, this will remove **all**
			/// existing values, and replace them with `value`.
			///
			/// # Example
			///
			/// ```rust
			/// use tagcodec::tag::{Accessor, Tag, TagType};
			///
			/// let mut tag = Tag::new(TagType::VorbisComments);
			#[doc = "tag.set_" $name $(_ $other)* "(String::from(\"Foo\"));"]
			///
			#[doc = "assert_eq!(tag." $name $(_ $other)* "().as_deref(), Some(\"Foo\"));"]
			/// ```
			fn [<
				set_ $name $(_ $other)*
			>] (&mut self, _value: $owned_ty) {}
		}
	};
	(@REMOVE_METHOD [$name:tt $($other:tt)*]) => {
		paste::paste! {
			#[doc = "Removes the " $name $(" " $other)* "."]
			///
			/// # Example
			///
			/// ```rust
			/// use tagcodec::tag::{Accessor, Tag, TagType};
			///
			/// let mut tag = Tag::new(TagType::Mp4Ilst);
			#[doc = "tag.set_" $name $(_ $other)* "(String::from(\"Foo\"));"]
			#[doc = "tag.remove_" $name $(_ $other)* "();"]
			///
			#[doc = "assert_eq!(tag." $name $(_ $other)* "(), None);"]
			/// ```
			fn [<
				remove_ $name $(_ $other)*
			>] (&mut self) {}
		}
	};
}

accessor_trait! {
	[artist]<Cow<'_, str>, String>, [title ]<Cow<'_, str>, String>,
	[album ]<Cow<'_, str>, String>, [genre ]<Cow<'_, str>, String>,
	[comment]<Cow<'_, str>, String>,
}
