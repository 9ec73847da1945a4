//! registry/primitives.rs
//! Bindings for the reserved tag range.

use crate::codec::{
    AnyCodec, BoolCodec, Complex128Codec, Complex64Codec, F32Codec, F64Codec, I16Codec, I32Codec,
    I64Codec, I8Codec, MapCodec, MarshalerCodec, StringCodec, U16Codec, U32Codec, U64Codec,
    U8Codec, Zone,
};
use crate::constants::PrimitiveTag;
use crate::registry::{Registry, RegistryConfig};
use crate::schema::{unmarshal_object, Marshaler, OpaqueDesc, TypeDesc};

impl Registry {
    /// Registry with every reserved tag bound.
    pub fn with_primitives() -> Self {
        Self::with_primitives_and_config(RegistryConfig::default())
    }

    pub fn with_primitives_and_config(config: RegistryConfig) -> Self {
        let mut registry = Self::with_config(config);
        registry.register_primitives();
        registry
    }

    /// Bind scalars, "any", the string-keyed dynamic map and `Zone` at
    /// their reserved tags. Panics if any of them is already bound.
    pub fn register_primitives(&mut self) {
        use PrimitiveTag as P;

        self.register_primitive(P::I32.tag(), I32Codec, TypeDesc::I32);
        self.register_primitive(P::I64.tag(), I64Codec, TypeDesc::I64);
        self.register_primitive(P::I8.tag(), I8Codec, TypeDesc::I8);
        self.register_primitive(P::I16.tag(), I16Codec, TypeDesc::I16);
        self.register_primitive(P::U8.tag(), U8Codec, TypeDesc::U8);
        self.register_primitive(P::U16.tag(), U16Codec, TypeDesc::U16);
        self.register_primitive(P::U32.tag(), U32Codec, TypeDesc::U32);
        self.register_primitive(P::U64.tag(), U64Codec, TypeDesc::U64);
        self.register_primitive(P::F32.tag(), F32Codec, TypeDesc::F32);
        self.register_primitive(P::F64.tag(), F64Codec, TypeDesc::F64);
        self.register_primitive(P::Bool.tag(), BoolCodec, TypeDesc::Bool);
        self.register_primitive(P::String.tag(), StringCodec, TypeDesc::String);
        self.register_primitive(P::Complex64.tag(), Complex64Codec, TypeDesc::Complex64);
        self.register_primitive(P::Complex128.tag(), Complex128Codec, TypeDesc::Complex128);
        self.register_primitive(P::Any.tag(), AnyCodec, TypeDesc::Any);
        self.register_primitive(
            P::DynMap.tag(),
            MapCodec::new(P::String.tag(), P::Any.tag()),
            TypeDesc::map(TypeDesc::String, TypeDesc::Any),
        );

        self.register_primitive(
            P::Zone.tag(),
            MarshalerCodec::new(zone_desc()),
            TypeDesc::Opaque(zone_desc()),
        );
    }
}

fn zone_desc() -> OpaqueDesc {
    OpaqueDesc::new(Zone::TYPE_NAME, unmarshal_object::<Zone>)
}
