//! Query Templates
//!
//! An interest template narrows what a responder may return: an Exclude
//! element listing components and membership filters in ascending canonical
//! order, an order preference, and an answer-origin directive. The
//! `TemplateBuilder` produces the bounded template used by version
//! discovery and is rebuilt in place for every round.

use crate::bloom::BloomFilter;
use crate::coding::{self, dtag, TokenType};
use crate::error::VersionError;
use crate::name::canonical_cmp;
use crate::types::{BOUND_SIZE_WINDOW, FUTURE_VERSION};
use std::cmp::Ordering;

/// One entry of an Exclude element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExcludeItem {
    /// Exactly this component is excluded.
    Component(Vec<u8>),
    /// Components in this gap that match the filter are excluded.
    Bloom(BloomFilter),
}

/// Ordered exclusion list over candidate next-components.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Exclude {
    items: Vec<ExcludeItem>,
}

impl Exclude {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[ExcludeItem] {
        &self.items
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn push_component(&mut self, component: &[u8]) {
        self.items.push(ExcludeItem::Component(component.to_vec()));
    }

    pub fn push_bloom(&mut self, filter: BloomFilter) {
        self.items.push(ExcludeItem::Bloom(filter));
    }

    /// Whether `component` is ruled out.
    pub fn excludes(&self, component: &[u8]) -> bool {
        let mut gap_filter: Option<&BloomFilter> = None;
        for item in &self.items {
            match item {
                ExcludeItem::Bloom(filter) => gap_filter = Some(filter),
                ExcludeItem::Component(fence) => match canonical_cmp(component, fence) {
                    Ordering::Equal => return true,
                    Ordering::Less => return gap_filter.is_some_and(|f| f.matches(component)),
                    Ordering::Greater => gap_filter = None,
                },
            }
        }
        gap_filter.is_some_and(|f| f.matches(component))
    }

    fn encode_into(&self, buf: &mut Vec<u8>) {
        coding::append_tt(buf, dtag::EXCLUDE, TokenType::Dtag);
        for item in &self.items {
            match item {
                ExcludeItem::Component(component) => {
                    coding::append_tagged_blob(buf, dtag::COMPONENT, component)
                }
                ExcludeItem::Bloom(filter) => {
                    coding::append_tagged_blob(buf, dtag::BLOOM, filter.as_bytes())
                }
            }
        }
        coding::append_closer(buf);
    }
}

/// Which field a responder orders candidates by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderField {
    Unspecified = 0,
    Arrival = 2,
    NameHierarchy = 4,
}

/// Which end of that order to answer from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderDirection {
    /// Lesser, earlier: work from the left.
    FromLeft = 0,
    /// Greater, later: work from the right.
    FromRight = 1,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderPreference {
    pub field: OrderField,
    pub direction: OrderDirection,
}

impl OrderPreference {
    /// Greatest name in hierarchy order.
    pub const HIGHEST: OrderPreference = OrderPreference {
        field: OrderField::NameHierarchy,
        direction: OrderDirection::FromRight,
    };

    pub fn value(&self) -> u8 {
        self.field as u8 | self.direction as u8
    }

    pub fn from_value(value: u8) -> Option<Self> {
        let field = match value & !1 {
            0 => OrderField::Unspecified,
            2 => OrderField::Arrival,
            4 => OrderField::NameHierarchy,
            _ => return None,
        };
        let direction = if value & 1 == 1 {
            OrderDirection::FromRight
        } else {
            OrderDirection::FromLeft
        };
        Some(Self { field, direction })
    }
}

/// Whether a responder may answer from stored content, generate new content,
/// or both.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerOrigin {
    ExistingOnly = 1,
    GenerateOnly = 2,
    ExistingOrGenerated = 3,
}

impl AnswerOrigin {
    pub fn allows_existing(&self) -> bool {
        (*self as u8) & 1 != 0
    }
}

/// An interest template: structured fields plus their encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterestTemplate {
    exclude: Option<Exclude>,
    order: Option<OrderPreference>,
    answer_origin: Option<AnswerOrigin>,
    encoded: Vec<u8>,
}

impl Default for InterestTemplate {
    fn default() -> Self {
        Self::new(None, None, None)
    }
}

impl InterestTemplate {
    pub fn new(
        exclude: Option<Exclude>,
        order: Option<OrderPreference>,
        answer_origin: Option<AnswerOrigin>,
    ) -> Self {
        let mut template = Self {
            exclude,
            order,
            answer_origin,
            encoded: Vec::new(),
        };
        template.encode();
        template
    }

    pub fn exclude(&self) -> Option<&Exclude> {
        self.exclude.as_ref()
    }

    pub fn order_preference(&self) -> Option<OrderPreference> {
        self.order
    }

    pub fn answer_origin(&self) -> AnswerOrigin {
        self.answer_origin
            .unwrap_or(AnswerOrigin::ExistingOrGenerated)
    }

    /// The ccnb Interest element (with an empty Name).
    pub fn as_bytes(&self) -> &[u8] {
        &self.encoded
    }

    /// Whether a candidate next-component survives the Exclude element.
    pub fn admits(&self, component: &[u8]) -> bool {
        !self
            .exclude
            .as_ref()
            .is_some_and(|exclude| exclude.excludes(component))
    }

    fn encode(&mut self) {
        let buf = &mut self.encoded;
        buf.clear();
        coding::append_tt(buf, dtag::INTEREST, TokenType::Dtag);
        coding::append_tt(buf, dtag::NAME, TokenType::Dtag);
        coding::append_closer(buf);
        if let Some(exclude) = &self.exclude {
            exclude.encode_into(buf);
        }
        if let Some(order) = self.order {
            coding::append_tagged_udata(buf, dtag::ORDER_PREFERENCE, &order.value().to_string());
        }
        if let Some(origin) = self.answer_origin {
            coding::append_tagged_udata(
                buf,
                dtag::ANSWER_ORIGIN_KIND,
                &(origin as u8).to_string(),
            );
        }
        coding::append_closer(buf);
    }
}

/// Reusable builder for the version-bounded template.
///
/// The template it yields admits only components strictly between `bound`
/// and the far-future sentinel, asks for the greatest such name, and
/// forbids the responder from generating new content.
#[derive(Debug, Default)]
pub struct TemplateBuilder {
    template: InterestTemplate,
}

impl TemplateBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild the template for a new lower bound.
    pub fn build_for_bound(&mut self, bound: &[u8]) -> Result<&InterestTemplate, VersionError> {
        if !BOUND_SIZE_WINDOW.contains(&bound.len()) {
            return Err(VersionError::InvalidBound(bound.len()));
        }
        let exclude = self.template.exclude.get_or_insert_with(Exclude::new);
        exclude.clear();
        exclude.push_bloom(BloomFilter::saturated());
        exclude.push_component(bound);
        exclude.push_component(&FUTURE_VERSION);
        exclude.push_bloom(BloomFilter::saturated());
        self.template.order = Some(OrderPreference::HIGHEST);
        self.template.answer_origin = Some(AnswerOrigin::ExistingOnly);
        self.template.encode();
        Ok(&self.template)
    }

    pub fn template(&self) -> &InterestTemplate {
        &self.template
    }
}
