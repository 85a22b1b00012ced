//! Sample request URLs that must parse, spanning hosts, service root
//! shapes and option combinations.

pub const VALID_URLS: &[&str] = &[
    "https://services.odata.org/V4/Northwind/Northwind.svc/Orders",
    "https://services.odata.org/V4/Northwind/Northwind.svc/Orders(10248)",
    "https://services.odata.org/V4/Northwind/Northwind.svc/Orders(10248)/Order_Details",
    "https://services.odata.org/V4/Northwind/Northwind.svc/Customers('ALFKI')/Orders?$top=5",
    "https://services.odata.org/V4/Northwind/Northwind.svc/Orders?$select=OrderID,OrderDate&$orderby=OrderDate desc",
    "https://services.odata.org/V4/Northwind/Northwind.svc/Products?$filter=UnitPrice gt 20 and Discontinued eq false",
    "https://services.odata.org/V4/Northwind/Northwind.svc/Products?$filter=startswith(ProductName,'Ch') or contains(ProductName,'ai')",
    "https://services.odata.org/V4/Northwind/Northwind.svc/Products/$count",
    "https://services.odata.org/V4/Northwind/Northwind.svc/Products(1)/ProductName/$value",
    "https://services.odata.org/V4/Northwind/Northwind.svc/Orders?$expand=Customer($select=CompanyName;$top=1),Order_Details",
    "https://services.odata.org/V4/Northwind/Northwind.svc/Orders?$count=true&$skip=10&$top=10",
    "https://services.odata.org/V4/Northwind/Northwind.svc/Customers?$search=berlin&$format=json",
    "https://services.odata.org/V2/Northwind/Northwind.svc/Orders?$inlinecount=allpages&$top=3",
    "https://services.odata.org/V2/Northwind/Northwind.svc/Orders?$filter=substringof('Alfreds',ShipName) eq true",
    "https://services.odata.org/V2/Northwind/Northwind.svc/Orders?$filter=OrderDate gt datetime'1997-01-01T00:00:00'",
    "http://localhost:4004/odata/v4/catalog/Books?$orderby=price mul 2 asc,title",
    "http://localhost:4004/odata/v4/catalog/Books(ID=201,IsActiveEntity=true)",
    "HTTPS://Example.COM/sap/opu/odata/sap/API_SALES_ORDER_SRV/A_SalesOrder('1')/to_Item",
    "https://example.com/sap/opu/odata/sap/API_SALES_ORDER_SRV/A_SalesOrder?$filter=SalesOrderType eq 'OR'&sap-client=100",
    "https://example.com/api/data/v9.2/accounts?$select=name&$filter=revenue ge 1000000.50m",
    "https://example.com/orders.svc/Orders?$filter=not (OrderID eq 1) and year(OrderDate) eq 2024",
    "https://example.com/orders.svc/Orders?$filter=ID eq 01234567-89ab-cdef-0123-456789abcdef",
    "https://example.com/orders.svc/Orders?$filter=Tags eq null&$skiptoken=abc123",
    "https://example.com/orders.svc/\n    Orders(1)/Items\n    ?$select=ItemID\n    &$top=2",
];

pub const APPLY_URLS: &[&str] = &[
    "https://example.com/orders.svc/Orders?$apply=groupby((CustomerName))",
    "https://example.com/orders.svc/Orders?$apply=aggregate(Price with sum as Total)",
    "https://example.com/orders.svc/Orders?$top=1&$APPLY=filter(OrderID gt 1)",
];

pub const LAMBDA_URLS: &[&str] = &[
    "https://example.com/orders.svc/Orders?$filter=Items/any(i:i/Quantity gt 1)",
    "https://example.com/orders.svc/Orders?$filter=Items/all(i:i/Price lt 10)",
    "https://example.com/orders.svc/Orders?$filter=any(i:i/Quantity gt 1)",
    "https://example.com/orders.svc/Orders?$orderby=Items/any(i:true)",
];
