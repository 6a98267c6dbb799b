//! Enumerated properties: closed code spaces with an `UNKNOWN` fallback.
//!
//! Every protocol field with a fixed code space (op-codes, message types,
//! directions) is an enum generated by [`enum_property!`]. Construction from a
//! wire code is total: a code outside the declared set yields `Unknown`, never
//! an error. Each type may also declare synthetic members that have no wire
//! code of their own (ICMP's `NoCode`).
//!
//! Inside layer data and flattened rows the concrete enum is erased to a
//! [`PropertyValue`], which remembers the type name and label so the storage
//! adapter can write the label and resolve it back on load.

use std::fmt;
use std::hash::Hash;

use super::arp::{ArpOpCode, HardwareType};
use super::dhcp::{BootpOpCode, DhcpMessageType};
use super::dns::{DnsDirection, DnsOpCode, DnsQType, DnsRCode};
use super::icmp::{IcmpCode, IcmpType, IcmpVersion};
use super::icmpv6::{Icmpv6Code, Icmpv6Type};
use super::ipv4::IpVersion;
use super::linux_sll::CookedPacketType;

/// Label shared by every property's sentinel member.
pub const UNKNOWN_LABEL: &str = "UNKNOWN";

/// Behavior shared by all enumerated property types.
pub trait Property: Copy + Eq + Hash + fmt::Debug + Send + Sync + 'static {
    /// Type name, used as the declared storage type.
    const TYPE_NAME: &'static str;

    /// All members, sentinel last.
    fn members() -> &'static [Self];

    /// Stable label of this member.
    fn label(&self) -> &'static str;

    /// Member with the given label.
    fn from_label(label: &str) -> Option<Self> {
        Self::members().iter().copied().find(|m| m.label() == label)
    }

    /// Whether this is the `UNKNOWN` sentinel.
    fn is_unknown(&self) -> bool {
        self.label() == UNKNOWN_LABEL
    }

    /// Erase to a [`PropertyValue`].
    fn value(&self) -> PropertyValue {
        PropertyValue {
            property: Self::TYPE_NAME,
            label: self.label(),
        }
    }
}

/// Type-erased enumerated property value.
///
/// Two values are equal when both the property type and the member label match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PropertyValue {
    property: &'static str,
    label: &'static str,
}

impl PropertyValue {
    /// Resolve a stored `(type name, label)` pair back to a member.
    pub fn resolve(property: &str, label: &str) -> Option<Self> {
        PROPERTY_TYPES
            .iter()
            .find(|(name, _)| *name == property)
            .and_then(|(_, resolve)| resolve(label))
    }

    pub fn property(&self) -> &'static str {
        self.property
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    pub fn is_unknown(&self) -> bool {
        self.label == UNKNOWN_LABEL
    }

    /// Whether this value is the given typed member.
    pub fn is<P: Property>(&self, member: P) -> bool {
        *self == member.value()
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label)
    }
}

type Resolver = fn(&str) -> Option<PropertyValue>;

fn resolve_as<P: Property>(label: &str) -> Option<PropertyValue> {
    P::from_label(label).map(|p| p.value())
}

static PROPERTY_TYPES: &[(&str, Resolver)] = &[
    (ArpOpCode::TYPE_NAME, resolve_as::<ArpOpCode> as Resolver),
    (HardwareType::TYPE_NAME, resolve_as::<HardwareType> as Resolver),
    (BootpOpCode::TYPE_NAME, resolve_as::<BootpOpCode> as Resolver),
    (DhcpMessageType::TYPE_NAME, resolve_as::<DhcpMessageType> as Resolver),
    (DnsDirection::TYPE_NAME, resolve_as::<DnsDirection> as Resolver),
    (DnsOpCode::TYPE_NAME, resolve_as::<DnsOpCode> as Resolver),
    (DnsQType::TYPE_NAME, resolve_as::<DnsQType> as Resolver),
    (DnsRCode::TYPE_NAME, resolve_as::<DnsRCode> as Resolver),
    (IcmpType::TYPE_NAME, resolve_as::<IcmpType> as Resolver),
    (IcmpCode::TYPE_NAME, resolve_as::<IcmpCode> as Resolver),
    (IcmpVersion::TYPE_NAME, resolve_as::<IcmpVersion> as Resolver),
    (Icmpv6Type::TYPE_NAME, resolve_as::<Icmpv6Type> as Resolver),
    (Icmpv6Code::TYPE_NAME, resolve_as::<Icmpv6Code> as Resolver),
    (IpVersion::TYPE_NAME, resolve_as::<IpVersion> as Resolver),
    (CookedPacketType::TYPE_NAME, resolve_as::<CookedPacketType> as Resolver),
];

/// Static type name of a known property type.
pub fn property_type_name(name: &str) -> Option<&'static str> {
    PROPERTY_TYPES
        .iter()
        .map(|(n, _)| *n)
        .find(|n| *n == name)
}

/// Declare an enumerated property type.
///
/// ```ignore
/// enum_property! {
///     /// ARP operation codes.
///     pub enum ArpOpCode: u16 {
///         Request = 1 => "REQUEST",
///         Reply = 2 => "REPLY",
///     }
/// }
/// ```
///
/// Codes may be tuples for composite keys. An optional `synthetic { .. }`
/// block adds members without a wire code. `Unknown` is always appended.
#[macro_export]
macro_rules! enum_property {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident: $code_ty:ty {
            $( $variant:ident = $code:expr => $label:literal, )*
        }
        $( synthetic { $( $syn_variant:ident => $syn_label:literal, )* } )?
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        $vis enum $name {
            $( $variant, )*
            $( $( $syn_variant, )* )?
            Unknown,
        }

        impl $name {
            const MEMBERS: &'static [$name] = &[
                $( $name::$variant, )*
                $( $( $name::$syn_variant, )* )?
                $name::Unknown,
            ];

            /// Member for a wire code; `Unknown` when the code is not declared.
            pub fn from_code(code: $code_ty) -> Self {
                $(
                    if code == $code {
                        return $name::$variant;
                    }
                )*
                $name::Unknown
            }

            /// Wire code of this member, if it has one.
            pub fn code(&self) -> Option<$code_ty> {
                match self {
                    $( $name::$variant => Some($code), )*
                    _ => None,
                }
            }

            pub fn label(&self) -> &'static str {
                match self {
                    $( $name::$variant => $label, )*
                    $( $( $name::$syn_variant => $syn_label, )* )?
                    $name::Unknown => $crate::protocol::UNKNOWN_LABEL,
                }
            }
        }

        impl $crate::protocol::Property for $name {
            const TYPE_NAME: &'static str = stringify!($name);

            fn members() -> &'static [Self] {
                Self::MEMBERS
            }

            fn label(&self) -> &'static str {
                $name::label(self)
            }
        }

        impl From<$name> for $crate::protocol::PropertyValue {
            fn from(value: $name) -> Self {
                $crate::protocol::Property::value(&value)
            }
        }

        impl From<$name> for $crate::protocol::FieldValue {
            fn from(value: $name) -> Self {
                $crate::protocol::FieldValue::Enum($crate::protocol::Property::value(&value))
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.label())
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_type_is_total() {
        for code in [0u16, 1, 2, 7, 255, 256, 1000, u16::MAX] {
            let _ = ArpOpCode::from_code(code);
            let _ = HardwareType::from_code(code);
            let _ = DnsQType::from_code(code);
        }
        for code in 0..=u8::MAX {
            let _ = DhcpMessageType::from_code(code);
            let _ = BootpOpCode::from_code(code);
            let _ = DnsOpCode::from_code(code);
            let _ = DnsRCode::from_code(code);
            let _ = IcmpType::from_code(code);
            let _ = Icmpv6Type::from_code(code);
            for sub in [0u8, 1, 5, 200] {
                let _ = IcmpCode::from_parts(code, sub);
                let _ = Icmpv6Code::from_parts(code, sub);
            }
        }
    }

    #[test]
    fn test_undeclared_code_is_unknown() {
        assert_eq!(ArpOpCode::from_code(4242), ArpOpCode::Unknown);
        assert_eq!(DhcpMessageType::from_code(99), DhcpMessageType::Unknown);
        assert_eq!(DnsOpCode::from_code(3), DnsOpCode::Unknown);
        assert!(ArpOpCode::Unknown.is_unknown());
        assert_eq!(ArpOpCode::Unknown.code(), None);
    }

    #[test]
    fn test_declared_code_round_trips() {
        let op = ArpOpCode::from_code(2);
        assert_eq!(op, ArpOpCode::Reply);
        assert_eq!(op.code(), Some(2));
        assert_eq!(op.label(), "REPLY");
    }

    #[test]
    fn test_property_value_identity() {
        let a: PropertyValue = DnsDirection::Query.into();
        let b: PropertyValue = DnsDirection::from_code(0).into();
        assert_eq!(a, b);
        assert!(a.is(DnsDirection::Query));
        assert!(!a.is(DnsDirection::Response));

        // Same label, different type
        let unknown_arp: PropertyValue = ArpOpCode::Unknown.into();
        let unknown_dns: PropertyValue = DnsOpCode::Unknown.into();
        assert_ne!(unknown_arp, unknown_dns);
    }

    #[test]
    fn test_resolve_from_label() {
        let value = PropertyValue::resolve("DhcpMessageType", "DHCPACK").unwrap();
        assert!(value.is(DhcpMessageType::Ack));
        assert!(PropertyValue::resolve("DhcpMessageType", "BOGUS").is_none());
        assert!(PropertyValue::resolve("Bogus", "DHCPACK").is_none());

        let unknown = PropertyValue::resolve("IcmpCode", "UNKNOWN").unwrap();
        assert!(unknown.is_unknown());
    }

    #[test]
    fn test_labels_are_unique_per_type() {
        fn check<P: Property>() {
            let members = P::members();
            for (i, a) in members.iter().enumerate() {
                for b in &members[i + 1..] {
                    assert_ne!(a.label(), b.label(), "{}", P::TYPE_NAME);
                }
            }
        }
        check::<ArpOpCode>();
        check::<HardwareType>();
        check::<DnsQType>();
        check::<IcmpCode>();
        check::<Icmpv6Code>();
        check::<DhcpMessageType>();
    }

    #[test]
    fn test_property_type_name_lookup() {
        assert_eq!(property_type_name("DnsQType"), Some("DnsQType"));
        assert_eq!(property_type_name("nope"), None);
    }
}
