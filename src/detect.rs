use crate::schema::DomainType;

/// Bilingual synonyms per domain, checked in declaration order.
///
/// A label matching keywords of several domains resolves to the first one
/// listed here.
const DOMAIN_KEYWORDS: &[(DomainType, &[&str])] = &[
    (
        DomainType::Sales,
        &["sales", "sale", "매출", "판매", "transaction", "거래", "revenue", "영수증"],
    ),
    (
        DomainType::Zone,
        &["zone", "구역", "area", "section", "layout", "매장배치", "존"],
    ),
    (
        DomainType::Traffic,
        &["traffic", "visitor", "방문", "유동", "footfall", "동선", "입장", "sensor", "센서"],
    ),
    (
        DomainType::Product,
        &["product", "상품", "제품", "item", "sku", "품목", "catalog"],
    ),
    (
        DomainType::Customer,
        &["customer", "고객", "회원", "member", "client", "구매자"],
    ),
    (
        DomainType::Inventory,
        &["inventory", "재고", "stock", "warehouse", "창고"],
    ),
];

/// Resolves a free-text dataset label to a domain by substring match.
pub fn detect_data_type(label: &str) -> DomainType {
    let lowered = label.to_lowercase();
    DOMAIN_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|keyword| lowered.contains(keyword)))
        .map(|(domain, _)| *domain)
        .unwrap_or(DomainType::Other)
}
