//! Shared fixtures for ripple integration tests.

#![allow(dead_code)]

use std::fs;
use std::path::Path;

use tempfile::TempDir;

/// Production sources of a small Spring shop.
///
/// ```text
/// OrderController -> OrderService -> OrderRepository -> Order <-> Customer
///                    OrderService <-> AuditService
///                    OrderService -> PaymentClient
/// OrderRequest (record) -> Customer
/// ```
pub const SHOP_SOURCES: &[(&str, &str)] = &[
    (
        "src/main/java/com/shop/web/OrderController.java",
        r"package com.shop.web;

import com.shop.service.OrderService;
import org.springframework.web.bind.annotation.RestController;

@RestController
@RequiredArgsConstructor
public class OrderController {
    private final OrderService orderService;
    private String greeting;
}
",
    ),
    (
        "src/main/java/com/shop/web/dto/OrderRequest.java",
        r"package com.shop.web.dto;

import com.shop.domain.Customer;

public record OrderRequest(Customer customer, int quantity) { }
",
    ),
    (
        "src/main/java/com/shop/service/OrderService.java",
        r"package com.shop.service;

import com.shop.client.PaymentClient;
import com.shop.repository.OrderRepository;

@Service
public class OrderService {
    private final OrderRepository repository;

    @Autowired
    private AuditService audit;

    public OrderService(OrderRepository repository, PaymentClient payments) {
        this.repository = repository;
    }
}
",
    ),
    (
        "src/main/java/com/shop/service/AuditService.java",
        r"package com.shop.service;

@Service
public class AuditService {
    @Autowired
    private OrderService orderService;
}
",
    ),
    (
        "src/main/java/com/shop/service/Broken.java",
        r"package com.shop.service;

public class Broken {
    void unfinished(
",
    ),
    (
        "src/main/java/com/shop/repository/OrderRepository.java",
        r"package com.shop.repository;

import com.shop.domain.Order;
import org.springframework.data.jpa.repository.JpaRepository;

public interface OrderRepository extends JpaRepository<Order, Long> { }
",
    ),
    (
        "src/main/java/com/shop/domain/Order.java",
        r"package com.shop.domain;

import java.util.List;

@Entity
@AllArgsConstructor
public class Order {
    private Customer customer;
    private List<OrderLine> lines;
}
",
    ),
    (
        "src/main/java/com/shop/domain/Customer.java",
        r"package com.shop.domain;

import java.util.List;

@Entity
@AllArgsConstructor
public class Customer {
    private List<Order> orders;
}
",
    ),
    (
        "src/main/java/com/shop/client/PaymentClient.java",
        r"package com.shop.client;

public class PaymentClient { }
",
    ),
];

/// Test sources for the shop.
pub const SHOP_TESTS: &[(&str, &str)] = &[
    (
        "src/test/java/com/shop/web/OrderControllerTest.java",
        r"package com.shop.web;

@SpringBootTest
class OrderControllerTest { }
",
    ),
    (
        "src/test/java/com/shop/service/OrderServiceTest.java",
        r"package com.shop.service;

class OrderServiceTest {
    @Test
    void placesOrder() { }
}
",
    ),
    (
        "src/test/java/com/shop/service/AuditServiceTest.java",
        r"package com.shop.service;

class AuditServiceTest {
    @Test
    void records() { }
}
",
    ),
    (
        "src/test/java/com/shop/client/PaymentClientTest.java",
        r"package com.shop.client;

class PaymentClientTest {
    @Test
    void pays() { }
}
",
    ),
    (
        "src/test/java/com/shop/repository/OrderRepositoryTests.java",
        r"package com.shop.repository;

class OrderRepositoryTests {
    @Test
    void finds() { }
}
",
    ),
    (
        "src/test/java/com/shop/support/Fixtures.java",
        r"package com.shop.support;

class Fixtures { }
",
    ),
];

/// Write files relative to `root`.
pub fn write_files(root: &Path, files: &[(&str, &str)]) {
    for (path, content) in files {
        let full_path = root.join(path);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).expect("failed to create parent dirs");
        }
        fs::write(&full_path, content).expect("failed to write file");
    }
}

/// A temporary shop project with a `ripple.yaml` for `com.shop`.
pub fn shop_project() -> TempDir {
    let dir = TempDir::new().expect("failed to create temp dir");
    write_files(dir.path(), SHOP_SOURCES);
    write_files(dir.path(), SHOP_TESTS);
    write_files(
        dir.path(),
        &[(
            "ripple.yaml",
            "base-package: com.shop\nadvisory:\n  enabled: false\n",
        )],
    );
    dir
}
