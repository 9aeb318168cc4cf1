//! Canonical domain schemas and the static registry that serves them.
//!
//! Six retail domains are supported. Each [`DataSchema`] lists its canonical
//! columns in declaration order together with a short bilingual description
//! and a handful of synonyms. The auto-mapper scores raw column names against
//! the text `name + description + examples`, so the synonym lists are kept
//! short: every extra keyword dilutes the score of the others.
//!
//! `relations` is advisory metadata for layers above this crate and is never
//! consulted during normalization.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::NormalizeError;

use ColumnType::{Array, Boolean, Date, Number, Object, String as Text};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DomainType {
    Sales,
    Zone,
    Traffic,
    Product,
    Customer,
    Inventory,
    Other,
}

impl DomainType {
    /// Every domain that has a canonical schema, in detection order.
    pub const KNOWN: [DomainType; 6] = [
        DomainType::Sales,
        DomainType::Zone,
        DomainType::Traffic,
        DomainType::Product,
        DomainType::Customer,
        DomainType::Inventory,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DomainType::Sales => "sales",
            DomainType::Zone => "zone",
            DomainType::Traffic => "traffic",
            DomainType::Product => "product",
            DomainType::Customer => "customer",
            DomainType::Inventory => "inventory",
            DomainType::Other => "other",
        }
    }
}

impl fmt::Display for DomainType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DomainType {
    type Err = NormalizeError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let lowered = value.trim().to_ascii_lowercase();
        match lowered.as_str() {
            "sales" => Ok(DomainType::Sales),
            "zone" => Ok(DomainType::Zone),
            "traffic" => Ok(DomainType::Traffic),
            "product" => Ok(DomainType::Product),
            "customer" => Ok(DomainType::Customer),
            "inventory" => Ok(DomainType::Inventory),
            "other" => Ok(DomainType::Other),
            _ => Err(NormalizeError::UnknownDomain(value.to_string())),
        }
    }
}

/// Semantic target type of a canonical column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    String,
    Number,
    Date,
    Boolean,
    Array,
    Object,
}

impl ColumnType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnType::String => "string",
            ColumnType::Number => "number",
            ColumnType::Date => "date",
            ColumnType::Boolean => "boolean",
            ColumnType::Array => "array",
            ColumnType::Object => "object",
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnSchema {
    pub name: &'static str,
    #[serde(rename = "type")]
    pub column_type: ColumnType,
    pub required: bool,
    pub description: &'static str,
    pub examples: &'static [&'static str],
}

impl ColumnSchema {
    /// Text the auto-mapper scores raw column names against.
    pub fn search_text(&self) -> String {
        let mut text = String::with_capacity(64);
        text.push_str(self.name);
        text.push(' ');
        text.push_str(self.description);
        for example in self.examples {
            text.push(' ');
            text.push_str(example);
        }
        text
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DataSchema {
    #[serde(rename = "type")]
    pub domain: DomainType,
    pub columns: &'static [ColumnSchema],
    pub relations: &'static [DomainType],
}

impl DataSchema {
    pub fn column(&self, name: &str) -> Option<&ColumnSchema> {
        self.columns.iter().find(|column| column.name == name)
    }

    pub fn column_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.columns.iter().map(|column| column.name)
    }

    pub fn required_columns(&self) -> impl Iterator<Item = &ColumnSchema> {
        self.columns.iter().filter(|column| column.required)
    }
}

const fn column(
    name: &'static str,
    column_type: ColumnType,
    required: bool,
    description: &'static str,
    examples: &'static [&'static str],
) -> ColumnSchema {
    ColumnSchema {
        name,
        column_type,
        required,
        description,
        examples,
    }
}

static SALES_COLUMNS: [ColumnSchema; 11] = [
    column("transaction_id", Text, false, "거래 번호", &["거래번호", "transactionid", "txn"]),
    column("timestamp", Date, true, "일시", &["timestamp", "datetime", "date", "거래일시"]),
    column("product_name", Text, true, "상품명", &["상품명", "제품명", "productname"]),
    column("product_category", Text, false, "카테고리", &["카테고리", "category", "상품분류"]),
    column("price", Number, true, "가격", &["price", "판매가격", "단가", "판매단가"]),
    column("quantity", Number, true, "수량", &["qty", "판매수량", "quantity"]),
    column("total_amount", Number, false, "결제 금액", &["total", "amount", "결제금액", "총금액"]),
    column("discount", Number, false, "할인", &["할인금액", "discount"]),
    column("payment_method", Text, false, "결제 수단", &["결제수단", "payment"]),
    column("customer_id", Text, false, "고객 번호", &["고객번호", "customerid", "회원번호"]),
    column("store_id", Text, false, "매장 코드", &["매장코드", "storeid", "store"]),
];

static ZONE_COLUMNS: [ColumnSchema; 7] = [
    column("zone_id", Text, true, "구역 코드", &["구역코드", "zoneid", "zone"]),
    column("zone_name", Text, true, "구역명", &["구역명", "zonename", "구역이름"]),
    column("zone_type", Text, false, "구역 유형", &["구역유형", "zonetype", "type"]),
    column("floor", Number, false, "층", &["floor", "층수", "level"]),
    column("area_sqm", Number, false, "면적", &["면적", "area", "sqm"]),
    column("coordinates", Array, false, "좌표", &["좌표", "coordinates", "position"]),
    column("capacity", Number, false, "수용 인원", &["수용인원", "capacity"]),
];

static TRAFFIC_COLUMNS: [ColumnSchema; 7] = [
    column("timestamp", Date, true, "측정일시", &["timestamp", "stamp", "date", "측정일시"]),
    column("zone_id", Text, true, "구역 코드", &["구역코드", "zoneid", "zone"]),
    column("visitor_count", Number, true, "방문자수", &["방문자수", "visitors", "visitorcount"]),
    column("dwell_time", Number, false, "체류 시간", &["체류시간", "dwell", "dwelltime"]),
    column("entry_count", Number, false, "입장 수", &["입장수", "entry", "entries"]),
    column("exit_count", Number, false, "퇴장 수", &["퇴장수", "exit", "exits"]),
    column("path", Array, false, "이동 경로", &["이동경로", "path", "route"]),
];

static PRODUCT_COLUMNS: [ColumnSchema; 9] = [
    column("product_id", Text, true, "상품 코드", &["상품코드", "productid", "sku"]),
    column("product_name", Text, true, "상품명", &["상품명", "제품명", "productname"]),
    column("product_category", Text, false, "카테고리", &["카테고리", "category", "상품분류"]),
    column("brand", Text, false, "브랜드", &["브랜드", "brand", "제조사"]),
    column("price", Number, false, "가격", &["price", "판매가격", "단가", "판매단가"]),
    column("cost", Number, false, "원가", &["원가", "cost", "매입가"]),
    column("barcode", Text, false, "바코드", &["바코드", "barcode", "ean"]),
    column("is_active", Boolean, false, "판매 여부", &["판매여부", "active", "isactive"]),
    column("tags", Array, false, "태그", &["태그", "tags", "tag"]),
];

static CUSTOMER_COLUMNS: [ColumnSchema; 9] = [
    column("customer_id", Text, true, "고객 번호", &["고객번호", "customerid", "회원번호"]),
    column("customer_name", Text, false, "고객명", &["고객명", "이름", "customername"]),
    column("gender", Text, false, "성별", &["성별", "gender", "sex"]),
    column("age", Number, false, "나이", &["나이", "연령", "age"]),
    column("membership_level", Text, false, "회원 등급", &["회원등급", "membership", "grade", "tier"]),
    column("join_date", Date, false, "가입일", &["가입일", "joindate", "joined"]),
    column("total_purchases", Number, false, "누적 구매액", &["누적구매액", "totalpurchases", "purchases"]),
    column("is_member", Boolean, false, "회원 여부", &["회원여부", "member", "ismember"]),
    column("preferences", Object, false, "선호 정보", &["선호정보", "preferences", "preference"]),
];

static INVENTORY_COLUMNS: [ColumnSchema; 7] = [
    column("product_id", Text, true, "상품 코드", &["상품코드", "productid", "sku"]),
    column("stock_quantity", Number, true, "재고 수량", &["재고수량", "stock", "stockquantity", "재고"]),
    column("timestamp", Date, false, "기준일시", &["timestamp", "datetime", "date", "기준일시"]),
    column("warehouse", Text, false, "창고", &["창고", "warehouse", "location"]),
    column("reorder_point", Number, false, "재주문 기준", &["재주문기준", "reorder", "reorderpoint"]),
    column("last_restocked", Date, false, "입고일", &["입고일", "restocked", "lastrestocked"]),
    column("is_low_stock", Boolean, false, "재고 부족 여부", &["재고부족", "lowstock", "islowstock"]),
];

static SCHEMAS: [DataSchema; 6] = [
    DataSchema {
        domain: DomainType::Sales,
        columns: &SALES_COLUMNS,
        relations: &[DomainType::Product, DomainType::Customer, DomainType::Zone],
    },
    DataSchema {
        domain: DomainType::Zone,
        columns: &ZONE_COLUMNS,
        relations: &[DomainType::Traffic, DomainType::Sales],
    },
    DataSchema {
        domain: DomainType::Traffic,
        columns: &TRAFFIC_COLUMNS,
        relations: &[DomainType::Zone],
    },
    DataSchema {
        domain: DomainType::Product,
        columns: &PRODUCT_COLUMNS,
        relations: &[DomainType::Sales, DomainType::Inventory],
    },
    DataSchema {
        domain: DomainType::Customer,
        columns: &CUSTOMER_COLUMNS,
        relations: &[DomainType::Sales],
    },
    DataSchema {
        domain: DomainType::Inventory,
        columns: &INVENTORY_COLUMNS,
        relations: &[DomainType::Product],
    },
];

pub fn get_schema(domain: DomainType) -> Option<&'static DataSchema> {
    SCHEMAS.iter().find(|schema| schema.domain == domain)
}

pub fn all_schemas() -> &'static [DataSchema] {
    &SCHEMAS
}
