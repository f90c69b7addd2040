use fp_decimal_type::define_fpd_type;
use serde::{Serialize, Serializer};

define_fpd_type!(name: NumI64P3, type: i64, precision: 3);

impl Serialize for NumI64P3 {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_f64(f64::from(*self))
    }
}
