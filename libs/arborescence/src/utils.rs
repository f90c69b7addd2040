use std::iter::FromIterator;
use std::ops::{Index, IndexMut};

/// Wrapper around Vec<T> to use non-usize number types as index for readability
#[derive(Clone, Debug)]
pub struct NumIndexVec<T> {
    data: Vec<T>,
}

impl<T: Clone> NumIndexVec<T> {
    pub fn with_default(size: usize, default: T) -> Self {
        Self {
            data: vec![default; size],
        }
    }
}

impl<T> NumIndexVec<T> {
    #[inline(always)]
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.data.iter()
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.data.len()
    }
}

macro_rules! impl_index_t {
    ($t:ty) => {
        impl<T> Index<$t> for NumIndexVec<T> {
            type Output = T;

            #[inline(always)]
            fn index(&self, index: $t) -> &Self::Output {
                &self.data[index as usize]
            }
        }

        impl<T> IndexMut<$t> for NumIndexVec<T> {
            #[inline(always)]
            fn index_mut(&mut self, index: $t) -> &mut Self::Output {
                &mut self.data[index as usize]
            }
        }
    };
}

impl<T> FromIterator<T> for NumIndexVec<T> {
    fn from_iter<E: IntoIterator<Item = T>>(iter: E) -> Self {
        Self {
            data: Vec::from_iter(iter),
        }
    }
}

impl_index_t!(usize);
impl_index_t!(u32);

macro_rules! num_index_vec {
    [$default:expr; $size:expr] => {
        NumIndexVec::with_default($size as usize, $default)
    };
}
