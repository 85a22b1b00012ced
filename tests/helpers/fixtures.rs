//! Metadata documents used across integration tests.

/// Service root the order fixtures are published under.
pub const ORDERS_ROOT: &str = "https://example.com/orders.svc";

/// Modern (4.0) document: `Order` with three properties and a navigation
/// to `Item`; entity sets `Orders` and `Items`.
pub const ORDERS_V4: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<edmx:Edmx Version="4.0" xmlns:edmx="http://docs.oasis-open.org/odata/ns/edmx">
  <edmx:DataServices>
    <Schema Namespace="Example.Orders" Alias="Ord" xmlns="http://docs.oasis-open.org/odata/ns/edm">
      <EntityType Name="Order">
        <Key>
          <PropertyRef Name="OrderID"/>
        </Key>
        <Property Name="OrderID" Type="Edm.Int32" Nullable="false"/>
        <Property Name="OrderDate" Type="Edm.DateTimeOffset"/>
        <Property Name="CustomerName" Type="Edm.String"/>
        <NavigationProperty Name="Items" Type="Collection(Ord.Item)"/>
      </EntityType>
      <EntityType Name="Item">
        <Key>
          <PropertyRef Name="ItemID"/>
        </Key>
        <Property Name="ItemID" Type="Edm.Int32" Nullable="false"/>
        <Property Name="Quantity" Type="Edm.Int32"/>
        <Property Name="Price" Type="Edm.Decimal"/>
      </EntityType>
      <Function Name="TopOrders">
        <Parameter Name="count" Type="Edm.Int32"/>
        <ReturnType Type="Collection(Ord.Order)"/>
      </Function>
      <EntityContainer Name="OrdersContainer">
        <EntitySet Name="Orders" EntityType="Ord.Order">
          <NavigationPropertyBinding Path="Items" Target="Items"/>
        </EntitySet>
        <EntitySet Name="Items" EntityType="Ord.Item"/>
        <FunctionImport Name="TopOrders" Function="Ord.TopOrders" EntitySet="Orders"/>
      </EntityContainer>
    </Schema>
  </edmx:DataServices>
</edmx:Edmx>"#;

/// Legacy (1.0) rendition of the same service, navigation through an
/// association, plus SAP-style annotations.
pub const ORDERS_V2: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<edmx:Edmx Version="1.0" xmlns:edmx="http://schemas.microsoft.com/ado/2007/06/edmx"
    xmlns:sap="http://www.sap.com/Protocols/SAPData">
  <edmx:DataServices xmlns:m="http://schemas.microsoft.com/ado/2007/08/dataservices/metadata"
      m:DataServiceVersion="2.0">
    <Schema Namespace="Example.Orders" xmlns="http://schemas.microsoft.com/ado/2008/09/edm">
      <EntityType Name="Order" sap:content-version="1">
        <Key>
          <PropertyRef Name="OrderID"/>
        </Key>
        <Property Name="OrderID" Type="Edm.Int32" Nullable="false" sap:label="Order"/>
        <Property Name="OrderDate" Type="Edm.DateTime"/>
        <Property Name="CustomerName" Type="Edm.String"/>
        <NavigationProperty Name="Items" Relationship="Example.Orders.Order_Items"
            FromRole="Order" ToRole="Items"/>
      </EntityType>
      <EntityType Name="Item">
        <Key>
          <PropertyRef Name="ItemID"/>
        </Key>
        <Property Name="ItemID" Type="Edm.Int32" Nullable="false"/>
        <Property Name="Quantity" Type="Edm.Int32"/>
        <NavigationProperty Name="Order" Relationship="Example.Orders.Order_Items"
            FromRole="Items" ToRole="Order"/>
      </EntityType>
      <Association Name="Order_Items">
        <End Role="Order" Type="Example.Orders.Order" Multiplicity="1"/>
        <End Role="Items" Type="Example.Orders.Item" Multiplicity="*"/>
      </Association>
      <EntityContainer Name="OrdersEntities" m:IsDefaultEntityContainer="true">
        <EntitySet Name="Orders" EntityType="Example.Orders.Order"/>
        <EntitySet Name="Items" EntityType="Example.Orders.Item"/>
        <AssociationSet Name="Order_Items_Set" Association="Example.Orders.Order_Items">
          <End Role="Order" EntitySet="Orders"/>
          <End Role="Items" EntitySet="Items"/>
        </AssociationSet>
        <FunctionImport Name="LatestOrder" ReturnType="Example.Orders.Order" EntitySet="Orders"
            m:HttpMethod="GET"/>
      </EntityContainer>
    </Schema>
  </edmx:DataServices>
</edmx:Edmx>"#;

/// SAP annotation namespace used by [`ORDERS_V2`].
pub const SAP_NS: &str = "http://www.sap.com/Protocols/SAPData";

/// Two schemas declaring a type of the same simple name, a complex type
/// and inheritance.
pub const CATALOG_V4: &str = r#"<edmx:Edmx Version="4.0" xmlns:edmx="http://docs.oasis-open.org/odata/ns/edmx">
  <edmx:DataServices>
    <Schema Namespace="Catalog.Common" xmlns="http://docs.oasis-open.org/odata/ns/edm">
      <ComplexType Name="Address">
        <Property Name="Street" Type="Edm.String"/>
        <Property Name="City" Type="Edm.String"/>
      </ComplexType>
      <EntityType Name="Product">
        <Property Name="Code" Type="Edm.String"/>
      </EntityType>
    </Schema>
    <Schema Namespace="Catalog.Service" xmlns="http://docs.oasis-open.org/odata/ns/edm">
      <EntityType Name="Party" Abstract="true">
        <Key><PropertyRef Name="ID"/></Key>
        <Property Name="ID" Type="Edm.Guid" Nullable="false"/>
        <Property Name="Address" Type="Catalog.Common.Address"/>
      </EntityType>
      <EntityType Name="Supplier" BaseType="Catalog.Service.Party">
        <Property Name="Rating" Type="Edm.Int16"/>
        <NavigationProperty Name="Products" Type="Collection(Catalog.Service.Product)"/>
      </EntityType>
      <EntityType Name="Product">
        <Key><PropertyRef Name="SKU"/></Key>
        <Property Name="SKU" Type="Edm.String" Nullable="false"/>
        <NavigationProperty Name="Supplier" Type="Catalog.Service.Supplier"/>
      </EntityType>
      <EntityContainer Name="Catalog">
        <EntitySet Name="Suppliers" EntityType="Catalog.Service.Supplier"/>
        <EntitySet Name="Products" EntityType="Catalog.Service.Product"/>
        <Singleton Name="FeaturedSupplier" Type="Catalog.Service.Supplier"/>
      </EntityContainer>
    </Schema>
  </edmx:DataServices>
</edmx:Edmx>"#;
